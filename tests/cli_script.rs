use assert_cmd::Command;
use chrono::Local;
use predicates::str::contains;
use tempfile::tempdir;

fn script_cmd(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("expense_cli").unwrap();
    cmd.env("EXPENSE_CORE_HOME", home)
        .env("EXPENSE_CORE_CLI_SCRIPT", "1");
    cmd
}

fn today_iso() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[test]
fn script_mode_adds_and_lists_transactions() {
    let home = tempdir().unwrap();
    let input = "add expense 120.50 Food \"weekly groceries\" 2025-03-01\nlist\nexit\n";

    script_cmd(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Transaction added."))
        .stdout(contains("₦120.50"))
        .stdout(contains("weekly groceries"));

    let json = std::fs::read_to_string(home.path().join("transactions.json")).unwrap();
    assert!(json.contains("\"Food\""));
    assert!(json.contains("\"type\": \"expense\""));
}

#[test]
fn budget_alert_fires_on_pre_insertion_spend() {
    let home = tempdir().unwrap();
    let today = today_iso();
    let input = format!(
        "budget Food 1000\n\
         add expense 900 Food first \"{today}\"\n\
         add expense 200 Food second \"{today}\"\n\
         add expense 200 Food third \"{today}\"\n\
         exit\n"
    );

    // First add sees zero spend (no alert), the second sees 900 (> 80% of
    // 1000, warning), the third sees 1100 (exceeded).
    script_cmd(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Budget for Food set to ₦1,000.00."))
        .stdout(contains("nearing your ₦1,000.00 budget for Food"))
        .stdout(contains("exceeded your ₦1,000.00 budget for Food"));
}

#[test]
fn delete_removes_the_addressed_row() {
    let home = tempdir().unwrap();
    let input = "add expense 10 Food first 2025-01-01\n\
                 add expense 20 Rent second 2025-01-02\n\
                 delete 1\n\
                 list\n\
                 exit\n";

    script_cmd(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Deleted expense of ₦10.00 (Food)."))
        .stdout(contains("Rent"));

    let json = std::fs::read_to_string(home.path().join("transactions.json")).unwrap();
    assert!(!json.contains("\"Food\""));
}

#[test]
fn edit_keeps_fields_marked_with_a_dash() {
    let home = tempdir().unwrap();
    let input = "add expense 10 Food lunch 2025-01-01\n\
                 edit 1 - 99.95 - - -\n\
                 list\n\
                 exit\n";

    script_cmd(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Transaction updated."))
        .stdout(contains("₦99.95"))
        .stdout(contains("lunch"));
}

#[test]
fn out_of_range_row_is_reported_not_fatal() {
    let home = tempdir().unwrap();
    let input = "add expense 10 Food lunch 2025-01-01\n\
                 delete 7\n\
                 list\n\
                 exit\n";

    script_cmd(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("no transaction at position 7"))
        .stdout(contains("Food"));
}

#[test]
fn invalid_amount_is_reported_and_the_shell_keeps_running() {
    let home = tempdir().unwrap();
    let input = "add expense twelve Food lunch 2025-01-01\nhelp\nexit\n";

    script_cmd(home.path())
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("invalid amount `twelve`"))
        .stdout(contains("Record an income or expense"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = tempdir().unwrap();

    script_cmd(home.path())
        .write_stdin("lst\nexit\n")
        .assert()
        .success()
        .stdout(contains("Did you mean `list`?"));
}

#[test]
fn corrupt_transactions_document_is_called_out() {
    let home = tempdir().unwrap();
    std::fs::write(home.path().join("transactions.json"), "{broken").unwrap();

    script_cmd(home.path())
        .write_stdin("list\nexit\n")
        .assert()
        .success()
        .stdout(contains("unreadable"))
        .stdout(contains("No transactions found."));
}

#[test]
fn monthly_report_is_chronological_and_skips_bad_dates() {
    let home = tempdir().unwrap();
    let input = "add income 100 Salary jan24 2024-01-05\n\
                 add income 1 Salary jan23 2023-01-10\n\
                 add expense 2 Food apr23 2023-04-20\n\
                 add expense 5 Food vague someday\n\
                 monthly\n\
                 exit\n";

    let assert = script_cmd(home.path()).write_stdin(input).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert!(stdout.contains("Skipping invalid date: someday"));
    let jan23 = stdout.find("January 2023").expect("January 2023 missing");
    let apr23 = stdout.find("April 2023").expect("April 2023 missing");
    let jan24 = stdout.find("January 2024").expect("January 2024 missing");
    assert!(jan23 < apr23 && apr23 < jan24, "months out of order:\n{stdout}");
}
