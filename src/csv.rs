//! Parses uploaded CSV files into candidate transactions.
//!
//! The expected format is comma separated with a header row:
//!
//! ```text
//! title, type, value, category
//! Loan, income, 1500, Transfer
//! Rent, outcome, 1200, Housing
//! ```
//!
//! `type` must be exactly `income` or `outcome` and `value` must be a
//! non-negative number.

use serde::Deserialize;

use crate::{
    Error,
    models::{CategoryTitle, TransactionKind},
};

/// The raw shape of one CSV line, before validation.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    title: String,
    #[serde(rename = "type")]
    kind: String,
    value: f64,
    category: String,
}

/// One validated row of an uploaded CSV file.
///
/// The category is still a title at this point; resolving it to a category ID
/// happens against the store during import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    /// A text description of what the transaction is for.
    pub title: String,
    /// The unsigned amount of money earned or spent.
    pub value: f64,
    /// Whether the row is an income or an outcome.
    pub kind: TransactionKind,
    /// The title of the category the row belongs to.
    pub category_title: CategoryTitle,
}

/// Parse `text` as CSV into validated rows, preserving input order.
///
/// Fields are trimmed of surrounding whitespace before validation.
///
/// # Errors
/// Returns [Error::InvalidCsv] naming the offending row if any row is
/// malformed: a missing column, an unparseable value, an unknown transaction
/// type, a negative or non-finite value, or an empty title.
pub fn parse_csv(text: &str) -> Result<Vec<ImportRow>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();

    for (index, record) in reader.deserialize::<CsvRecord>().enumerate() {
        // Header is row 1, so data rows start at 2.
        let row_number = index + 2;
        let record = record.map_err(|error| {
            Error::InvalidCsv(format!("row {row_number} is malformed: {error}"))
        })?;

        rows.push(validate_record(record).map_err(|error| {
            Error::InvalidCsv(format!("row {row_number} is invalid: {error}"))
        })?);
    }

    Ok(rows)
}

fn validate_record(record: CsvRecord) -> Result<ImportRow, Error> {
    let kind: TransactionKind = record.kind.parse()?;
    let category_title = CategoryTitle::new(&record.category)?;

    let title = record.title.trim();
    if title.is_empty() {
        return Err(Error::EmptyTitle);
    }

    // "NaN" and "inf" parse as f64 and would sneak past the sign check.
    if !record.value.is_finite() {
        return Err(Error::NonFiniteValue(record.value));
    }

    if record.value < 0.0 {
        return Err(Error::NegativeValue(record.value));
    }

    Ok(ImportRow {
        title: title.to_string(),
        value: record.value,
        kind,
        category_title,
    })
}

#[cfg(test)]
mod parse_csv_tests {
    use crate::{
        Error,
        models::{CategoryTitle, TransactionKind},
    };

    use super::parse_csv;

    #[test]
    fn parses_rows_in_input_order() {
        let text = "title,type,value,category\n\
                    Loan,income,1500,Transfer\n\
                    Rent,outcome,1200,Housing\n";

        let rows = parse_csv(text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Loan");
        assert_eq!(rows[0].kind, TransactionKind::Income);
        assert_eq!(rows[0].value, 1500.0);
        assert_eq!(rows[0].category_title, CategoryTitle::new_unchecked("Transfer"));
        assert_eq!(rows[1].title, "Rent");
        assert_eq!(rows[1].kind, TransactionKind::Outcome);
    }

    #[test]
    fn trims_whitespace_around_fields() {
        let text = "title, type, value, category\n\
                    Salary , income , 3000 , Work\n";

        let rows = parse_csv(text).unwrap();

        assert_eq!(rows[0].title, "Salary");
        assert_eq!(rows[0].category_title, CategoryTitle::new_unchecked("Work"));
    }

    #[test]
    fn header_only_input_yields_no_rows() {
        let rows = parse_csv("title,type,value,category\n").unwrap();

        assert!(rows.is_empty());
    }

    #[test]
    fn rejects_unknown_transaction_type() {
        let text = "title,type,value,category\n\
                    Loan,transfer,1500,Misc\n";

        let result = parse_csv(text);

        assert!(matches!(result, Err(Error::InvalidCsv(message)) if message.contains("row 2")));
    }

    #[test]
    fn rejects_non_numeric_value() {
        let text = "title,type,value,category\n\
                    Loan,income,lots,Misc\n";

        let result = parse_csv(text);

        assert!(matches!(result, Err(Error::InvalidCsv(_))));
    }

    #[test]
    fn rejects_negative_value() {
        let text = "title,type,value,category\n\
                    Loan,income,-5,Misc\n";

        let result = parse_csv(text);

        assert!(matches!(result, Err(Error::InvalidCsv(message)) if message.contains("negative")));
    }

    #[test]
    fn rejects_nan_value() {
        let text = "title,type,value,category\n\
                    Loan,income,NaN,Misc\n";

        let result = parse_csv(text);

        assert!(matches!(result, Err(Error::InvalidCsv(message)) if message.contains("finite")));
    }

    #[test]
    fn rejects_infinite_value() {
        let text = "title,type,value,category\n\
                    Loan,income,inf,Misc\n";

        let result = parse_csv(text);

        assert!(matches!(result, Err(Error::InvalidCsv(_))));
    }

    #[test]
    fn rejects_missing_column() {
        let text = "title,type,value,category\n\
                    Loan,income,1500\n";

        let result = parse_csv(text);

        assert!(matches!(result, Err(Error::InvalidCsv(_))));
    }

    #[test]
    fn rejects_empty_title() {
        let text = "title,type,value,category\n\
                    ,income,1500,Misc\n";

        let result = parse_csv(text);

        assert!(matches!(result, Err(Error::InvalidCsv(_))));
    }
}
