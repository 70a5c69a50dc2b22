/*!
 * Tests for CSV script reading
 */

use anyhow::Result;
use std::path::PathBuf;
use vocaboost::errors::ConfigError;
use vocaboost::script::{RowFlag, ScriptReader};
use crate::common;

/// Rows come back in file order with their line numbers
#[test]
fn test_records_withMixedFlags_shouldKeepFileOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(
        temp_dir.path(),
        "words.csv",
        &[
            "y,A,B,one,one,いち,out/1.mp3,1".to_string(),
            "n,A,B,two,two,に,out/2.mp3,1".to_string(),
            "maybe,A,B,three,three,さん,out/3.mp3,1".to_string(),
        ],
    )?;

    let records = ScriptReader::open(&script, b',')?
        .records()
        .collect::<Result<Vec<_>, _>>()?;

    assert_eq!(records.len(), 3);
    assert_eq!(records.iter().map(|r| r.line).collect::<Vec<_>>(), vec![2, 3, 4]);
    assert_eq!(records[0].flag(), RowFlag::Enabled);
    assert_eq!(records[1].flag(), RowFlag::Disabled);
    assert_eq!(records[2].flag(), RowFlag::Unrecognized("maybe".to_string()));

    Ok(())
}

/// The header is never validated, even when it has the wrong shape
#[test]
fn test_records_withOddHeader_shouldStillParseRows() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_file(
        temp_dir.path(),
        "odd.csv",
        "just one header column\ny,Artist,Album,Title,Hello,こんにちは,/tmp/out/hello.mp3, 2 \n",
    )?;

    let records = ScriptReader::open(&script, b',')?
        .records()
        .collect::<Result<Vec<_>, _>>()?;
    let row = records[0].to_row()?;

    assert_eq!(row.title, "Title");
    assert_eq!(row.output_path, PathBuf::from("/tmp/out/hello.mp3"));
    assert_eq!(row.loop_count, 2);

    Ok(())
}

/// A tab separated script is read with the tab delimiter
#[test]
fn test_records_withTabDelimiter_shouldSplitOnTabs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_file(
        temp_dir.path(),
        "words.tsv",
        "h\ny\tA\tB\tT\tHello, world\t世界\tw.mp3\t3\n",
    )?;

    let records = ScriptReader::open(&script, b'\t')?
        .records()
        .collect::<Result<Vec<_>, _>>()?;
    let row = records[0].to_row()?;

    assert_eq!(row.english_text, "Hello, world");
    assert_eq!(row.loop_count, 3);

    Ok(())
}

/// Bad loop counts are reported as config errors
#[test]
fn test_toRow_withBadLoopCount_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(
        temp_dir.path(),
        "bad.csv",
        &["y,A,B,T,Hello,こんにちは,x.mp3,0".to_string()],
    )?;

    let records = ScriptReader::open(&script, b',')?
        .records()
        .collect::<Result<Vec<_>, _>>()?;

    assert!(matches!(
        records[0].to_row(),
        Err(ConfigError::InvalidLoopCount { line: 2, .. })
    ));

    Ok(())
}

/// A missing script is a config error
#[test]
fn test_open_withMissingFile_shouldFail() {
    let result = ScriptReader::open("definitely/not/here.csv", b',');
    assert!(matches!(result, Err(ConfigError::Script(_))));
}
