// Reading the whitespace-separated input file.

use robust_rank::builder::Builder;

use crate::rra::*;

/// One parsed data row.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedRecord {
    pub item: String,
    pub group: String,
    pub list: String,
    pub value: f64,
}

/// Parses the content of an input file. `path` is only used in error messages.
///
/// The first line is the header and must have 4 fields. Blank lines are skipped.
pub fn parse_records(path: &str, content: &str) -> RraCliResult<Vec<ParsedRecord>> {
    let mut lines = content.lines().enumerate();
    let header = lines
        .by_ref()
        .find(|(_, l)| !l.trim().is_empty())
        .context(EmptyInputSnafu { path })?;
    debug!("parse_records: header: {:?}", header.1);
    if header.1.split_whitespace().count() != 4 {
        return MalformedRowSnafu {
            path,
            lineno: header.0 + 1,
            content: header.1,
        }
        .fail();
    }

    let mut res: Vec<ParsedRecord> = Vec::new();
    for (idx, line) in lines {
        let lineno = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => {}
            [item, group, list, value_s] => {
                let value = value_s
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .context(MalformedRowSnafu {
                        path,
                        lineno,
                        content: line,
                    })?;
                res.push(ParsedRecord {
                    item: item.to_string(),
                    group: group.to_string(),
                    list: list.to_string(),
                    value,
                });
            }
            _ => {
                return MalformedRowSnafu {
                    path,
                    lineno,
                    content: line,
                }
                .fail();
            }
        }
    }
    Ok(res)
}

/// Reads the input file and assembles the groups and lists.
pub fn read_dataset(path: &str, options: &RraOptions) -> RraCliResult<Dataset> {
    let content = fs::read_to_string(path).context(OpeningInputSnafu { path })?;
    let records = parse_records(path, &content)?;
    debug!("read_dataset: {} records", records.len());

    let mut builder = Builder::new(options).context(AggregationSnafu {})?;
    for r in records.iter() {
        builder
            .add_item(&r.item, &r.group, &r.list, r.value)
            .context(AggregationSnafu {})?;
    }
    debug!(
        "read_dataset: {} groups, {} lists",
        builder.num_groups(),
        builder.num_lists()
    );
    builder.build().context(AggregationSnafu {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_skipped() {
        let content = "item group list value\nsg1 geneA s1 -1.5\n\nsg2\tgeneB\ts1\t2e-3\n";
        let res = parse_records("in.txt", content).unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(
            res[1],
            ParsedRecord {
                item: "sg2".to_string(),
                group: "geneB".to_string(),
                list: "s1".to_string(),
                value: 0.002,
            }
        );
    }

    #[test]
    fn wrong_field_count() {
        let content = "item group list value\nsg1 geneA s1 1.0\nsg2 geneB 2.0\n";
        match parse_records("in.txt", content) {
            Err(RraCliError::MalformedRow { lineno, .. }) => assert_eq!(lineno, 3),
            x => panic!("unexpected {:?}", x),
        }
    }

    #[test]
    fn bad_header() {
        let content = "item group value\nsg1 geneA s1 1.0\n";
        assert!(matches!(
            parse_records("in.txt", content),
            Err(RraCliError::MalformedRow { lineno: 1, .. })
        ));
    }

    #[test]
    fn bad_value() {
        let content = "item group list value\nsg1 geneA s1 abc\n";
        match parse_records("in.txt", content) {
            Err(RraCliError::MalformedRow {
                lineno, content, ..
            }) => {
                assert_eq!(lineno, 2);
                assert_eq!(content, "sg1 geneA s1 abc");
            }
            x => panic!("unexpected {:?}", x),
        }
        let content = "item group list value\nsg1 geneA s1 NaN\n";
        assert!(matches!(
            parse_records("in.txt", content),
            Err(RraCliError::MalformedRow { lineno: 2, .. })
        ));
    }

    #[test]
    fn empty_file() {
        assert!(matches!(
            parse_records("in.txt", "\n\n"),
            Err(RraCliError::EmptyInput { .. })
        ));
    }

    #[test]
    fn header_only_is_an_empty_dataset() {
        let path = std::env::temp_dir().join(format!("rra-tools-{}-header-only.txt", std::process::id()));
        fs::write(&path, "item group list value\n").unwrap();
        let res = read_dataset(&path.display().to_string(), &RraOptions::DEFAULT_OPTIONS);
        fs::remove_file(&path).unwrap();
        assert!(matches!(
            res,
            Err(RraCliError::Aggregation {
                source: RraError::EmptyDataset
            })
        ));
    }
}
