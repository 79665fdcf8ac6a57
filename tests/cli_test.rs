use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("loyalty-ledger"));
    cmd.arg("tests/fixtures/orders.csv")
        .arg("--accounts")
        .arg("tests/fixtures/accounts.json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,role,total_spent,tier,wallet_balance",
        ))
        // The referrer collected 2% of both referred orders, spent nothing.
        .stdout(predicate::str::contains("ana,customer,0,1,4.00"))
        // 3% cashback on a 50 order.
        .stdout(predicate::str::contains("beto,customer,50,1,1.50"))
        // 150 crosses into Silver: 5%.
        .stdout(predicate::str::contains("carla,customer,150,2,7.50"))
        // The admin account is never touched.
        .stdout(predicate::str::contains("root,admin,0,1,0"));

    Ok(())
}

#[test]
fn test_cli_orders_for_unknown_accounts_do_not_abort() -> Result<(), Box<dyn std::error::Error>> {
    // No seed file: every order hits a missing account and is skipped.
    let mut cmd = Command::new(cargo_bin!("loyalty-ledger"));
    cmd.arg("tests/fixtures/orders.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,role,total_spent,tier,wallet_balance",
        ))
        .stdout(predicate::str::contains("beto").not());

    Ok(())
}

#[test]
fn test_cli_missing_input_file() {
    let mut cmd = Command::new(cargo_bin!("loyalty-ledger"));
    cmd.arg("tests/fixtures/does_not_exist.csv");
    cmd.assert().failure();
}
