use crate::csv_import::{
    execute, execute_with_default, resolve_pledge, ColumnMapping, CsvTable, GuestEntry,
};
use crate::errors::Error;
use crate::types::{DEFAULT_PLEDGE_AMOUNT, MAX_PLEDGE_AMOUNT};

fn table(headers: &[&str], rows: &[&[&str]]) -> CsvTable {
    CsvTable {
        headers: headers.iter().map(|s| s.to_string()).collect(),
        rows: rows
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    }
}

#[test]
fn drops_rows_without_name_and_defaults_pledge() {
    let csv = table(&["Name", "Phone"], &[&["Amina", "0712345"], &["", "0799999"]]);
    let guests = execute(&csv, &ColumnMapping::from_indices(0, 1, -1)).unwrap();
    assert_eq!(
        guests,
        vec![GuestEntry {
            name: "Amina".into(),
            phone: "0712345".into(),
            pledge_amount: DEFAULT_PLEDGE_AMOUNT,
        }]
    );
}

#[test]
fn unmapped_name_or_phone_is_rejected() {
    let csv = table(&["Name", "Phone"], &[&["Amina", "0712345"]]);
    for mapping in [
        ColumnMapping::from_indices(-1, 1, -1),
        ColumnMapping::from_indices(0, -1, -1),
    ] {
        assert!(matches!(execute(&csv, &mapping), Err(Error::Validation(_))));
    }
}

#[test]
fn out_of_range_column_is_rejected() {
    let csv = table(&["Name", "Phone"], &[&["Amina", "0712345"]]);
    let err = execute(&csv, &ColumnMapping::from_indices(0, 1, 5)).unwrap_err();
    assert!(matches!(err, Error::Validation(msg) if msg.contains("pledge")));
}

#[test]
fn pledge_column_parses_with_fallback() {
    let csv = table(
        &["Phone", "Full name", "Ahadi"],
        &[
            &["0711", "Baraka", "50000"],
            &["0722", "Neema", "abc"],
            &["0733", "Juma", "1500.6"],
            &["0744", "Zawadi", "-10"],
            &["0755", "Rehema"],
            &["0766", "Asha", "NaN"],
        ],
    );
    let guests = execute_with_default(&csv, &ColumnMapping::from_indices(1, 0, 2), 10_000).unwrap();
    let amounts: Vec<(&str, i64)> = guests
        .iter()
        .map(|g| (g.name.as_str(), g.pledge_amount))
        .collect();
    assert_eq!(
        amounts,
        vec![
            ("Baraka", 50_000),
            ("Neema", 10_000),
            ("Juma", 1_501),
            ("Zawadi", 10_000),
            ("Rehema", 10_000),
            ("Asha", 10_000),
        ]
    );
}

#[test]
fn short_rows_and_blank_phones_are_dropped() {
    let csv = table(
        &["Name", "Phone"],
        &[&["Amina"], &["Juma", "   "], &["Asha", "0700"]],
    );
    let guests = execute(&csv, &ColumnMapping::from_indices(0, 1, -1)).unwrap();
    assert_eq!(guests.len(), 1);
    assert_eq!(guests[0].name, "Asha");
}

#[test]
fn parse_reads_headers_and_rows() {
    let text = "Name, Phone ,Pledge\r\nAmina,0712345,30000\r\n\r\n  \nJuma ,0799, \n";
    let csv = CsvTable::parse(text).unwrap();
    assert_eq!(csv.headers, vec!["Name", "Phone", "Pledge"]);
    assert_eq!(
        csv.rows,
        vec![
            vec!["Amina", "0712345", "30000"],
            vec!["Juma", "0799", ""],
        ]
    );
}

#[test]
fn parse_does_not_unquote_commas() {
    let csv = CsvTable::parse("Name,Phone\n\"Said, Amina\",0712").unwrap();
    assert_eq!(csv.rows[0], vec!["\"Said", "Amina\"", "0712"]);
}

#[test]
fn parse_requires_a_data_row() {
    assert!(matches!(CsvTable::parse(""), Err(Error::Validation(_))));
    assert!(matches!(CsvTable::parse("Name,Phone\n\n"), Err(Error::Validation(_))));
}

#[test]
fn manual_entries_follow_import_rules() {
    assert!(GuestEntry::new(" ", "0711", None, 5).is_none());
    let e = GuestEntry::new(" Amina ", " 0711 ", Some(0.0), 5).unwrap();
    assert_eq!((e.name.as_str(), e.phone.as_str(), e.pledge_amount), ("Amina", "0711", 5));
    assert_eq!(resolve_pledge(Some(42.4), 5), 42);
    assert_eq!(resolve_pledge(None, 5), 5);
    assert_eq!(resolve_pledge(Some(f64::INFINITY), 5), 5);
}

#[test]
fn pledges_above_the_cap_fall_back_to_default() {
    assert_eq!(resolve_pledge(Some(9.0e18), 5), 5);
    assert_eq!(resolve_pledge(Some(MAX_PLEDGE_AMOUNT as f64 + 1.0), 5), 5);
    assert_eq!(
        resolve_pledge(Some(MAX_PLEDGE_AMOUNT as f64), 5),
        MAX_PLEDGE_AMOUNT
    );
}
