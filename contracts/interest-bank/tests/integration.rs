use cosmwasm_std::{coins, Addr, Empty, Event, StdResult, Uint128};
use cw_multi_test::{App, Contract, ContractWrapper, Executor};

use interest_bank::contract::{execute, instantiate, migrate, query};
use interest_bank::msg::{
    BalanceResponse, ExecuteMsg, InstantiateMsg, InterestPaidEventsResponse, InterestResponse,
    QueryMsg,
};
use interest_bank::ContractError;
use shared::SECONDS_PER_YEAR;

const DENOM: &str = "uatom";
const OWNER: &str = "owner";
const ALICE: &str = "alice";
const BOB: &str = "bob";

fn bank_contract() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(execute, instantiate, query).with_migrate(migrate);
    Box::new(contract)
}

fn setup(annual_rate: u64) -> (App, Addr) {
    let mut app = App::new(|router, _api, storage| {
        for (user, amount) in [(OWNER, 1_000_000u128), (ALICE, 10_000), (BOB, 10_000)] {
            router
                .bank
                .init_balance(storage, &Addr::unchecked(user), coins(amount, DENOM))
                .unwrap();
        }
    });

    let code_id = app.store_code(bank_contract());
    let bank_addr = app
        .instantiate_contract(
            code_id,
            Addr::unchecked(OWNER),
            &InstantiateMsg {
                denom: DENOM.to_string(),
                annual_rate: Some(annual_rate),
            },
            &[],
            "interest-bank",
            None,
        )
        .unwrap();

    // reserve that backs capitalized interest
    app.send_tokens(
        Addr::unchecked(OWNER),
        bank_addr.clone(),
        &coins(100_000, DENOM),
    )
    .unwrap();

    (app, bank_addr)
}

fn wallet(app: &App, user: &str) -> u128 {
    app.wrap().query_balance(user, DENOM).unwrap().amount.u128()
}

fn ledger_balance(app: &App, bank: &Addr, user: &str) -> u128 {
    let res: BalanceResponse = app
        .wrap()
        .query_wasm_smart(
            bank,
            &QueryMsg::Balance {
                caller: user.to_string(),
            },
        )
        .unwrap();
    res.balance.u128()
}

#[test]
fn deposit_and_withdraw_move_funds() {
    let (mut app, bank) = setup(0);

    app.execute_contract(
        Addr::unchecked(ALICE),
        bank.clone(),
        &ExecuteMsg::Deposit {},
        &coins(100, DENOM),
    )
    .unwrap();
    app.execute_contract(
        Addr::unchecked(ALICE),
        bank.clone(),
        &ExecuteMsg::Deposit {},
        &coins(100, DENOM),
    )
    .unwrap();
    assert_eq!(ledger_balance(&app, &bank, ALICE), 200);
    assert_eq!(wallet(&app, ALICE), 9_800);

    app.execute_contract(
        Addr::unchecked(ALICE),
        bank.clone(),
        &ExecuteMsg::Withdraw {
            amount: Uint128::new(50),
        },
        &[],
    )
    .unwrap();
    assert_eq!(ledger_balance(&app, &bank, ALICE), 150);
    assert_eq!(wallet(&app, ALICE), 9_850);
}

#[test]
fn failed_calls_leave_no_trace() {
    let (mut app, bank) = setup(0);

    let err = app
        .execute_contract(
            Addr::unchecked(ALICE),
            bank.clone(),
            &ExecuteMsg::Deposit {},
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::InvalidAmount {}
    );

    let err = app
        .execute_contract(
            Addr::unchecked(BOB),
            bank.clone(),
            &ExecuteMsg::Withdraw {
                amount: Uint128::new(1),
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::InsufficientBalance {}
    );

    assert_eq!(ledger_balance(&app, &bank, ALICE), 0);
    assert_eq!(wallet(&app, ALICE), 10_000);
    assert_eq!(wallet(&app, BOB), 10_000);
}

#[test]
fn interest_accrues_over_a_year() {
    let (mut app, bank) = setup(10);

    app.execute_contract(
        Addr::unchecked(ALICE),
        bank.clone(),
        &ExecuteMsg::Deposit {},
        &coins(1_000, DENOM),
    )
    .unwrap();

    app.update_block(|block| {
        block.time = block.time.plus_seconds(SECONDS_PER_YEAR);
        block.height += 1;
    });

    let pending: InterestResponse = app
        .wrap()
        .query_wasm_smart(
            &bank,
            &QueryMsg::UserInterest {
                caller: OWNER.to_string(),
                user: ALICE.to_string(),
            },
        )
        .unwrap();
    assert_eq!(pending.interest, Uint128::new(100));

    let res = app
        .execute_contract(
            Addr::unchecked(ALICE),
            bank.clone(),
            &ExecuteMsg::Deposit {},
            &coins(1, DENOM),
        )
        .unwrap();
    assert!(res.has_event(&Event::new("wasm-interest_paid").add_attribute("amount", "100")));
    assert_eq!(ledger_balance(&app, &bank, ALICE), 1_101);

    // capitalized interest is withdrawable from the reserve
    app.execute_contract(
        Addr::unchecked(ALICE),
        bank.clone(),
        &ExecuteMsg::Withdraw {
            amount: Uint128::new(1_101),
        },
        &[],
    )
    .unwrap();
    assert_eq!(wallet(&app, ALICE), 10_100);

    let events: InterestPaidEventsResponse = app
        .wrap()
        .query_wasm_smart(
            &bank,
            &QueryMsg::InterestPaidEvents {
                account: None,
                start_after: None,
                limit: None,
            },
        )
        .unwrap();
    assert_eq!(events.events.len(), 1);
    assert_eq!(events.events[0].account, Addr::unchecked(ALICE));
}

#[test]
fn admin_controls_rate() {
    let (mut app, bank) = setup(0);

    let err = app
        .execute_contract(
            Addr::unchecked(ALICE),
            bank.clone(),
            &ExecuteMsg::SetAnnualInterestRate { rate: 10 },
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::Unauthorized {}
    );

    app.execute_contract(
        Addr::unchecked(OWNER),
        bank.clone(),
        &ExecuteMsg::AddAdmin {
            address: ALICE.to_string(),
        },
        &[],
    )
    .unwrap();
    app.execute_contract(
        Addr::unchecked(ALICE),
        bank.clone(),
        &ExecuteMsg::SetAnnualInterestRate { rate: 10 },
        &[],
    )
    .unwrap();

    let res: StdResult<BalanceResponse> = app.wrap().query_wasm_smart(
        &bank,
        &QueryMsg::UserBalance {
            caller: BOB.to_string(),
            user: ALICE.to_string(),
        },
    );
    assert!(res.unwrap_err().to_string().contains("Unauthorized"));
}
