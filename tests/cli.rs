#[cfg(test)]
mod cli {
    use std::fs;
    use std::path::{Path, PathBuf};

    use report_table::cli::{check, export_json, gather, open_report, show};
    use report_table::{EngineConfig, Report, ReportError, Table};

    fn _write_shard(dir: &Path, file_name: &str, keys: &[&str]) -> PathBuf {
        let mut table = Table::new_unsorted("CountReads", "reads per key").unwrap();
        table.add_column("key", "%s").unwrap();
        table.add_column("reads", "%d").unwrap();
        for (reads, key) in keys.iter().enumerate() {
            table.set(*key, "key", *key).unwrap();
            table.set(*key, "reads", reads as i64 + 1).unwrap();
        }

        let mut report = Report::new();
        report.add_table(table).unwrap();

        let path = dir.join(file_name);
        let mut buffer = Vec::new();
        report.write(&mut buffer).unwrap();
        fs::write(&path, buffer).unwrap();
        path
    }

    #[test]
    fn cli_gather_concatenates_shards() {
        let dir = tempfile::tempdir().unwrap();
        let shards = vec![
            _write_shard(dir.path(), "shard1.grp", &["a", "b"]),
            _write_shard(dir.path(), "shard2.grp", &["c"]),
        ];
        let output = dir.path().join("gathered.grp");

        let gathered = gather(&output, &shards, &EngineConfig::default()).unwrap();
        assert_eq!(gathered.table("CountReads").unwrap().num_rows(), 3);

        let reread = open_report(&output, &EngineConfig::default()).unwrap();
        assert!(reread.equals(&gathered));
    }

    #[test]
    fn cli_gather_fails_on_mismatched_shards() {
        let dir = tempfile::tempdir().unwrap();
        let good = _write_shard(dir.path(), "good.grp", &["a"]);

        let mut other = Report::new();
        other.add_table(Table::new("Other", "").unwrap()).unwrap();
        let bad = dir.path().join("bad.grp");
        let mut buffer = Vec::new();
        other.write(&mut buffer).unwrap();
        fs::write(&bad, buffer).unwrap();

        let result = gather(&dir.path().join("out.grp"), &[good, bad], &EngineConfig::default());
        assert!(matches!(result, Err(ReportError::FormatMismatch { .. })));
    }

    #[test]
    fn cli_check_show_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = _write_shard(dir.path(), "report.grp", &["x", "y"]);
        let config = EngineConfig::default();

        let checks = check(&path, &config).unwrap();
        assert_eq!(checks.len(), 1);
        assert!(checks[0].round_trips);
        assert_eq!(checks[0].n_rows, 2);

        let mut out = Vec::new();
        show(&path, &config, &mut out).unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with("#:GATKTable:2:2:%s:%d:;\n#:GATKTable:CountReads:reads per key\n"));

        let json = export_json(&path, &config).unwrap();
        assert!(json.contains("\"CountReads\""));
    }

    #[test]
    fn cli_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_report(&dir.path().join("missing.grp"), &EngineConfig::default());

        assert!(matches!(result, Err(ReportError::Io(_))));
    }
}
