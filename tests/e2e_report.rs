// trcfilter - tests/e2e_report.rs
//
// End-to-end tests for the report and clean pipelines.
//
// These tests exercise the real filesystem: real input files, real walkdir
// traversal, real CSV reports on disk, real JSON summaries. No mocks. This
// covers the full path from a raw pipe-delimited log file to the per-table
// report files an operator actually opens.

use trcfilter::app::clean;
use trcfilter::app::run::{collect_inputs, run_report, RunOptions};
use trcfilter::core::classify::ThrowLog;
use trcfilter::core::schema::SchemaRevision;
use trcfilter::core::transform::timestamp_to_datetime;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to an on-disk fixture file.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn options(input: PathBuf, revision: SchemaRevision, throw_log: ThrowLog) -> RunOptions {
    RunOptions {
        inputs: vec![input],
        revision,
        throw_log,
        output_dir: None,
        summary_json: None,
    }
}

/// Read one report and split it into its lines.
fn report_lines(dir: &Path, name: &str) -> Vec<String> {
    let path = dir.join(format!("{name}.csv"));
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
        .lines()
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Report E2E
// =============================================================================

/// A full ep8 run produces every table report except the gated throw log,
/// with the fixture's records routed to the right tables.
#[test]
fn e2e_ep8_report_writes_all_tables() {
    let out = tempfile::tempdir().unwrap();
    let mut opts = options(
        fixture("worldsvr_ep8_sample.log"),
        SchemaRevision::Ep8,
        ThrowLog::Disabled,
    );
    opts.output_dir = Some(out.path().to_path_buf());

    let summary = run_report(&opts).unwrap();
    assert!(summary.succeeded());
    assert_eq!(summary.processed.len(), 1);
    assert!(summary.failed.is_empty());

    // Every table file exists except the suppressed throw log.
    for name in [
        "AuctionHouse_Log",
        "PersonalShop_Log",
        "Trade_Log",
        "GuildWarehouse_Log",
        "Mail_Log",
        "No_Entry_Hack_Log",
    ] {
        assert!(
            out.path().join(format!("{name}.csv")).is_file(),
            "missing report {name}.csv"
        );
    }
    assert!(
        !out.path().join("Throw_Log.csv").exists(),
        "throw report must not be created when throw logging is off"
    );

    // Counters reflect every fixture line.
    assert_eq!(summary.counters.lines_read, 19);
    assert_eq!(summary.counters.personal_shop, 1);
    assert_eq!(summary.counters.trade, 3);
    assert_eq!(summary.counters.auction_house, 1);
    assert_eq!(summary.counters.guild_warehouse, 2);
    assert_eq!(summary.counters.mail, 2);
    assert_eq!(summary.counters.entry, 4);
    assert_eq!(summary.counters.throw, 0);
    assert_eq!(summary.counters.throw_suppressed, 2);
    assert_eq!(summary.counters.empty_after_normalize, 2);
    assert_eq!(summary.counters.unmatched_code, 1);
    assert_eq!(summary.counters.truncated_records, 1);

    // Trade report: header plus three rows, in input order. The second raw
    // trade line carries a \N and a blank field; normalization strips them,
    // so it lands on the same columns as the clean line before it.
    let trade = report_lines(out.path(), "Trade_Log");
    assert_eq!(trade[0], "TimeStamp,SrcCharIDX,DesCharIDX,ItemKind,ItemOpt,Alz");
    assert_eq!(trade.len(), 4);
    let ts = timestamp_to_datetime("1693180801").unwrap();
    assert_eq!(trade[1], format!("{ts},100,200,5,1,-"));
    assert!(trade[2].ends_with(",100,200,5,1,-"));
    assert!(trade[3].ends_with(",100,200,-,-,9000"));

    // Auction house total price is the computed product.
    let auction = report_lines(out.path(), "AuctionHouse_Log");
    assert_eq!(auction[1], "900,901,55,7,250,4,1000");

    // Guild warehouse carries both the deposit and the alz withdrawal.
    let warehouse = report_lines(out.path(), "GuildWarehouse_Log");
    assert_eq!(warehouse[1], "900,42,In,5,1,3,-");
    assert_eq!(warehouse[2], "42,77,Out,-,-,-,7777");

    // Entry report composes its human-readable action messages.
    let entry = report_lines(out.path(), "No_Entry_Hack_Log");
    assert!(entry[1].ends_with(",555,Dungeon entry used: 12-3. Slot: 2 Dungeon: 77."));
    assert!(entry[2].ends_with(",555,Dungeon: 77 started."));
    assert!(entry[3].ends_with(",-,Disconnect from IP: 203.0.113.5."));
    assert!(entry[4].ends_with(",-,Characteridx: 314 entered the channel."));
}

/// Enabling throw logging materialises the throw report and its rows.
#[test]
fn e2e_throw_log_enabled_materialises_throw_table() {
    let out = tempfile::tempdir().unwrap();
    let mut opts = options(
        fixture("worldsvr_ep8_sample.log"),
        SchemaRevision::Ep8,
        ThrowLog::Enabled,
    );
    opts.output_dir = Some(out.path().to_path_buf());

    let summary = run_report(&opts).unwrap();
    assert_eq!(summary.counters.throw, 2);
    assert_eq!(summary.counters.throw_suppressed, 0);

    let throw = report_lines(out.path(), "Throw_Log");
    assert_eq!(throw[0], "CharacterIDX,ItemKind,ItemOpt,Throw/Pickup");
    assert_eq!(throw[1], "777,123,9,Throw");
    assert_eq!(throw[2], "777,123,9,Pickup");
}

/// The v3 revision reads the same events at its wider field offsets.
#[test]
fn e2e_v3_report_uses_wide_offsets() {
    let out = tempfile::tempdir().unwrap();
    let mut opts = options(
        fixture("worldsvr_v3_sample.log"),
        SchemaRevision::V3,
        ThrowLog::Disabled,
    );
    opts.output_dir = Some(out.path().to_path_buf());

    let summary = run_report(&opts).unwrap();
    assert_eq!(summary.counters.personal_shop, 1);
    assert_eq!(summary.counters.trade, 2);
    assert_eq!(summary.counters.entry, 2);

    let shop = report_lines(out.path(), "PersonalShop_Log");
    assert_eq!(shop[1], "900,901,55,7,5000");

    // Under v3 the channel-entry event does carry a character index.
    let entry = report_lines(out.path(), "No_Entry_Hack_Log");
    assert!(entry[1].ends_with(",314,Characteridx: 314 entered the channel."));
}

/// Cleaning a file first and classifying the result produces byte-identical
/// reports to classifying the raw file, because normalization runs inline.
#[test]
fn e2e_clean_then_report_matches_raw_report() {
    let work = tempfile::tempdir().unwrap();
    let raw = work.path().join("raw.log");
    fs::copy(fixture("worldsvr_ep8_sample.log"), &raw).unwrap();

    let stats = clean::clean_file(&raw).unwrap();
    assert_eq!(stats.lines_read, 19);
    assert_eq!(stats.lines_retained, 17); // sentinel-only and blank lines drop

    let raw_out = tempfile::tempdir().unwrap();
    let mut raw_opts = options(raw, SchemaRevision::Ep8, ThrowLog::Enabled);
    raw_opts.output_dir = Some(raw_out.path().to_path_buf());
    let raw_summary = run_report(&raw_opts).unwrap();

    let cleaned_out = tempfile::tempdir().unwrap();
    let mut cleaned_opts = options(stats.output, SchemaRevision::Ep8, ThrowLog::Enabled);
    cleaned_opts.output_dir = Some(cleaned_out.path().to_path_buf());
    let cleaned_summary = run_report(&cleaned_opts).unwrap();

    assert_eq!(
        raw_summary.counters.total_rows(),
        cleaned_summary.counters.total_rows()
    );

    for entry in fs::read_dir(raw_out.path()).unwrap() {
        let name = entry.unwrap().file_name();
        let from_raw = fs::read_to_string(raw_out.path().join(&name)).unwrap();
        let from_cleaned = fs::read_to_string(cleaned_out.path().join(&name)).unwrap();
        assert_eq!(from_raw, from_cleaned, "report {name:?} differs");
    }
}

/// The JSON summary is written where asked and carries the run counters.
#[test]
fn e2e_summary_json_written() {
    let out = tempfile::tempdir().unwrap();
    let summary_path = out.path().join("summary.json");
    let mut opts = options(
        fixture("worldsvr_ep8_sample.log"),
        SchemaRevision::Ep8,
        ThrowLog::Disabled,
    );
    opts.output_dir = Some(out.path().join("reports"));
    opts.summary_json = Some(summary_path.clone());

    run_report(&opts).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(parsed["revision"], "ep8");
    assert_eq!(parsed["counters"]["trade"], 3);
    assert_eq!(parsed["counters"]["lines_read"], 19);
    assert_eq!(parsed["processed"].as_array().unwrap().len(), 1);
}

/// A missing input is recorded as failed while the rest of the run proceeds.
#[test]
fn e2e_missing_input_is_recorded_not_fatal() {
    let out = tempfile::tempdir().unwrap();
    let opts = RunOptions {
        inputs: vec![
            PathBuf::from("/definitely/not/here.log"),
            fixture("worldsvr_v3_sample.log"),
        ],
        revision: SchemaRevision::V3,
        throw_log: ThrowLog::Disabled,
        output_dir: Some(out.path().to_path_buf()),
        summary_json: None,
    };

    let summary = run_report(&opts).unwrap();
    assert!(summary.succeeded());
    assert_eq!(summary.processed.len(), 1);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].reason, "file not found");
}

/// Directory inputs are expanded to their log files, ignoring other files.
#[test]
fn e2e_directory_input_expands_to_log_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(
        fixture("worldsvr_ep8_sample.log"),
        dir.path().join("WorldSvr_01.GameLog"),
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "not a log\n").unwrap();

    let (files, failed) = collect_inputs(&[dir.path().to_path_buf()]);
    assert!(failed.is_empty());
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("WorldSvr_01.GameLog"));
}

/// Without an explicit output directory the reports land in
/// `<first input stem>_reports` next to the input.
#[test]
fn e2e_default_output_dir_is_derived_from_input() {
    let work = tempfile::tempdir().unwrap();
    let input = work.path().join("WorldSvr_01.log");
    fs::copy(fixture("worldsvr_v3_sample.log"), &input).unwrap();

    let opts = options(input, SchemaRevision::V3, ThrowLog::Disabled);
    let summary = run_report(&opts).unwrap();

    assert_eq!(summary.output_dir, work.path().join("WorldSvr_01_reports"));
    assert!(summary.output_dir.join("Trade_Log.csv").is_file());
}
