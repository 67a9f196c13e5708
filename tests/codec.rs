#[cfg(test)]
mod codec {
    use report_table::report::{read_table, write_table};
    use report_table::{
        Coercion, ReadPhase, Report, ReportError, ReportVersion, Table, Value,
    };

    fn _sample_table() -> Table {
        let mut table = Table::new("T", "desc").unwrap();
        table.add_column("id", "%s").unwrap();
        table.add_column("count", "%d").unwrap();
        table.set(0, "id", "a").unwrap();
        table.set(0, "count", 5i64).unwrap();
        table
    }

    fn _write_to_string(table: &Table) -> Result<String, ReportError> {
        let mut buffer = Vec::new();
        table.write(&mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }

    fn _read_from_str(text: &str) -> Result<Table, ReportError> {
        Table::read(&mut text.as_bytes(), ReportVersion::V1_1)
    }

    #[test]
    fn codec_writes_fixed_width_lines() {
        let text = _write_to_string(&_sample_table()).unwrap();
        let lines: Vec<&str> = text.split('\n').collect();

        assert_eq!(lines[0], "#:GATKTable:2:1:%s:%d:;");
        assert_eq!(lines[1], "#:GATKTable:T:desc");
        assert_eq!(lines[2], "id  count");
        assert_eq!(lines[3], "a   5    ");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn codec_widths_follow_the_widest_value() {
        let mut table = _sample_table();
        table.set(1, "id", "a-much-longer-id").unwrap();
        table.set(1, "count", 1234567i64).unwrap();

        let text = _write_to_string(&table).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[2], "id                count  ");
        assert_eq!(lines[3], "a                 5      ");
        assert_eq!(lines[4], "a-much-longer-id  1234567");
    }

    #[test]
    fn codec_round_trips_a_table() {
        let mut table = Table::new("Counts.v2", "counts: per read group").unwrap();
        table.add_column("group", "%s").unwrap();
        table.add_column("reads", "%d").unwrap();
        table.add_column("rate", "%.4f").unwrap();
        table.add_column("base", "%c").unwrap();
        table.add_column("extra", "").unwrap();

        for (group, reads, rate, base) in [
            ("rg2", 20i64, 0.5, 'C'),
            ("rg1", 10i64, 0.25, 'A'),
            ("rg3", 30i64, 0.125, 'T'),
        ] {
            table.set(group, "group", group).unwrap();
            table.set(group, "reads", reads).unwrap();
            table.set(group, "rate", rate).unwrap();
            table.set(group, "base", base).unwrap();
            table.set(group, "extra", "x").unwrap();
        }

        let text = _write_to_string(&table).unwrap();
        let reread = _read_from_str(&text).unwrap();

        assert!(reread.equals(&table));
        assert_eq!(reread.name(), "Counts.v2");
        assert_eq!(reread.description(), "counts: per read group");
        assert!(!reread.sort_by_row_id());

        // Rows were written in row ID order and read back in that order.
        assert_eq!(reread.get_at(0, 0).unwrap(), Some(&Value::from("rg1")));
        assert_eq!(reread.get_at(0, 1).unwrap(), Some(&Value::Integer(10)));
        assert_eq!(reread.get_at(0, 2).unwrap(), Some(&Value::Decimal(0.25)));
        assert_eq!(reread.get_at(0, 3).unwrap(), Some(&Value::Character('A')));
        assert!(reread.contains_row_id(2usize));
    }

    #[test]
    fn codec_unknown_columns_write_decimals_with_eight_places() {
        let mut table = Table::new_unsorted("T", "").unwrap();
        table.add_column("ratio", "").unwrap();
        table.set("r", "ratio", 0.25).unwrap();

        let text = _write_to_string(&table).unwrap();
        assert_eq!(text.lines().nth(3), Some("0.25000000"));
    }

    #[test]
    fn codec_unwritten_cells_are_null_and_round_trip() {
        let mut table = Table::new_unsorted("T", "").unwrap();
        table.add_column("c", "%d").unwrap();
        table.add_column("d", "%s").unwrap();
        table.set_at(1, 0, 3i64).unwrap();

        let text = _write_to_string(&table).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "c     d   ");
        assert_eq!(lines[3], "null  null");
        assert_eq!(lines[4], "3     null");

        let reread = _read_from_str(&text).unwrap();
        assert!(reread.equals(&table));
    }

    #[test]
    fn codec_sorted_write_requires_a_bijection() {
        let mut table = _sample_table();
        table.add_row_id_mapping("alias", 0, false).unwrap();

        assert!(matches!(
            _write_to_string(&table),
            Err(ReportError::NotBijective { ids: 2, rows: 1, .. })
        ));

        let mut table = _sample_table();
        table.remove_row_id_mapping(0);
        assert!(matches!(
            _write_to_string(&table),
            Err(ReportError::NotBijective { ids: 0, rows: 1, .. })
        ));
    }

    #[test]
    fn codec_sorted_write_rejects_mixed_row_ids() {
        let mut table = _sample_table();
        table.set("b", "id", "b").unwrap();

        assert!(matches!(
            _write_to_string(&table),
            Err(ReportError::MixedRowIds(_))
        ));

        // The same rows write fine when not sorted by row ID.
        let mut unsorted = Table::new_unsorted("T", "desc").unwrap();
        unsorted.add_column("id", "%s").unwrap();
        unsorted.set(0, "id", "a").unwrap();
        unsorted.set("b", "id", "b").unwrap();
        assert!(_write_to_string(&unsorted).is_ok());
    }

    #[test]
    fn codec_rejects_an_overflowing_column_count() {
        let text = "#:GATKTable:18446744073709551615:0:;\n#:GATKTable:T:d\nn\n\n";

        assert!(matches!(
            _read_from_str(text),
            Err(ReportError::Malformed {
                phase: ReadPhase::Header,
                ..
            })
        ));
    }

    #[test]
    fn codec_round_trips_a_blank_character() {
        let mut table = Table::new_unsorted("Flags", "").unwrap();
        table.add_column("flag", "%c").unwrap();
        table.set_at(0, 0, ' ').unwrap();
        table.set_at(1, 0, 'x').unwrap();

        let text = _write_to_string(&table).unwrap();
        let reread = _read_from_str(&text).unwrap();

        assert_eq!(reread.get_at(0, 0).unwrap(), Some(&Value::Character(' ')));
        assert_eq!(reread.get_at(1, 0).unwrap(), Some(&Value::Character('x')));
        assert!(reread.equals(&table));
    }

    #[test]
    fn codec_reads_missing_description_as_empty() {
        let text = "#:GATKTable:1:1:%d:;\n#:GATKTable:T\nn\n7\n\n";
        let table = _read_from_str(text).unwrap();

        assert_eq!(table.description(), "");
        assert_eq!(table.get_at(0, 0).unwrap(), Some(&Value::Integer(7)));
    }

    #[test]
    fn codec_reports_the_failing_phase() {
        let truncated = "#:GATKTable:1:2:%d:;\n#:GATKTable:T:d\nn\n7\n";
        assert!(matches!(
            _read_from_str(truncated),
            Err(ReportError::Malformed {
                phase: ReadPhase::DataLine,
                ..
            })
        ));

        let no_names = "#:GATKTable:1:0:%d:;\n#:GATKTable:T:d\n";
        assert!(matches!(
            _read_from_str(no_names),
            Err(ReportError::Malformed {
                phase: ReadPhase::ColumnNames,
                ..
            })
        ));

        let bad_header = "#:Something:1:0:%d:;\n#:GATKTable:T:d\nn\n\n";
        assert!(matches!(
            _read_from_str(bad_header),
            Err(ReportError::Malformed {
                phase: ReadPhase::Header,
                ..
            })
        ));

        let bad_trailer = "#:GATKTable:1:1:%d:;\n#:GATKTable:T:d\nn\n7\n8\n";
        assert!(matches!(
            _read_from_str(bad_trailer),
            Err(ReportError::Malformed {
                phase: ReadPhase::TrailingLine,
                ..
            })
        ));
    }

    #[test]
    fn codec_type_errors_surface_while_reading() {
        let text = "#:GATKTable:1:1:%d:;\n#:GATKTable:T:d\nn\nseven\n\n";

        assert!(matches!(
            _read_from_str(text),
            Err(ReportError::TypeMismatch { .. })
        ));
        assert!(matches!(
            read_table(&mut text.as_bytes(), ReportVersion::V1_1, Coercion::Strict),
            Err(ReportError::Coercion { .. })
        ));
    }

    #[test]
    fn codec_write_table_matches_table_write() {
        let table = _sample_table();
        let mut buffer = Vec::new();
        write_table(&table, &mut buffer).unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), _write_to_string(&table).unwrap());
    }

    #[test]
    fn codec_report_rejects_unsupported_versions() {
        let text = "#:GATKReport.v1.0:1\n#:GATKTable:1:1:%d:;\n#:GATKTable:T:d\nn\n7\n\n";

        assert!(matches!(
            Report::read(&mut text.as_bytes()),
            Err(ReportError::UnsupportedVersion(_))
        ));
    }
}

#[cfg(test)]
mod report {
    use report_table::{Report, ReportError, Table};

    fn _create_report(ids: &[&str]) -> Report {
        let mut counts = Table::new("counts", "per key").unwrap();
        counts.add_column("key", "%s").unwrap();
        counts.add_column("n", "%d").unwrap();
        for id in ids {
            counts.add_row_id(*id, true).unwrap();
            counts.increment(*id, "n").unwrap();
        }

        let mut summary = Table::new_unsorted("summary", "").unwrap();
        summary.add_column("metric", "%s").unwrap();
        summary.add_column("value", "%.2f").unwrap();
        summary.set("keys", "metric", "keys").unwrap();
        summary.set("keys", "value", ids.len() as f64).unwrap();

        let mut report = Report::new();
        report.add_table(counts).unwrap();
        report.add_table(summary).unwrap();
        report
    }

    #[test]
    fn report_round_trips_all_tables() {
        let report = _create_report(&["b", "a", "c"]);

        let mut buffer = Vec::new();
        report.write(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("#:GATKReport.v1.1:2\n#:GATKTable:2:3:%s:%d:;\n"));

        let reread = Report::read(&mut text.as_bytes()).unwrap();
        assert_eq!(reread.table_names(), vec!["counts", "summary"]);
        assert!(reread.equals(&report));
    }

    #[test]
    fn report_rejects_duplicate_tables() {
        let mut report = _create_report(&["a"]);
        let duplicate = Table::new("counts", "").unwrap();

        assert!(matches!(
            report.add_table(duplicate),
            Err(ReportError::DuplicateTable(_))
        ));
    }

    #[test]
    fn report_concat_gathers_matching_tables() {
        let mut gathered = _create_report(&["a", "b"]);
        gathered.concat(_create_report(&["c"])).unwrap();

        assert_eq!(gathered.table("counts").unwrap().num_rows(), 3);
        assert_eq!(gathered.table("summary").unwrap().num_rows(), 2);
        assert_eq!(gathered.table("counts").unwrap().row_index("c"), Some(2));
    }

    #[test]
    fn report_concat_rejects_different_layouts() {
        let mut gathered = _create_report(&["a"]);
        let mut other = Report::new();
        other.add_table(Table::new("counts", "per key").unwrap()).unwrap();

        assert!(matches!(
            gathered.concat(other),
            Err(ReportError::FormatMismatch { .. })
        ));
    }

    #[test]
    fn report_exports_json() {
        let report = _create_report(&["a"]);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["version"], "#:GATKReport.v1.1");
        assert_eq!(json["tables"][0]["name"], "counts");
        assert_eq!(json["tables"][0]["columns"][1]["datatype"], "Integer");
        assert_eq!(json["tables"][0]["rows"][0][0], "a");
        assert_eq!(json["tables"][0]["rows"][0][1], 1);
    }
}
