/*!
 * Integration tests for single row rendering
 */

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use vocaboost::app_config::TimelineOptions;
use vocaboost::audio::decode_file;
use vocaboost::errors::PipelineError;
use vocaboost::pipeline::RowOutcome;
use vocaboost::script::VocabularyRow;
use vocaboost::synthesis::MockSynthesizer;
use vocaboost::tagging::{Id3TagWriter, TrackTags};
use crate::common;

fn hello_row(output_path: PathBuf, loop_count: u32) -> VocabularyRow {
    VocabularyRow {
        line: 2,
        enabled: true,
        artist: "ArtistA".to_string(),
        album: "AlbumA".to_string(),
        title: "Hello".to_string(),
        english_text: "Hello".to_string(),
        japanese_text: "こんにちは".to_string(),
        output_path,
        loop_count,
    }
}

/// The reference scenario: two loops, default options, tagged output
#[tokio::test]
async fn test_process_helloRow_shouldWriteTaggedTimeline() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let output_path = temp_dir.path().join("out").join("hello.mp3");
    let (pipeline, synthesizer) = common::working_pipeline(TimelineOptions::default());

    let outcome = pipeline.process(&hello_row(output_path.clone(), 2)).await?;

    assert_eq!(outcome, RowOutcome::Written(output_path.clone()));
    assert!(output_path.is_file());

    let tags = Id3TagWriter::read_tags(&output_path)?;
    assert_eq!(
        tags,
        TrackTags {
            title: "Hello".to_string(),
            artist: "ArtistA".to_string(),
            album: "AlbumA".to_string(),
        }
    );

    // English first, then Japanese, each synthesized once
    assert_eq!(
        synthesizer.requests(),
        vec![
            ("en-US".to_string(), "Hello".to_string()),
            ("ja-JP".to_string(), "こんにちは".to_string()),
        ]
    );

    // 100 + en + 500 + ja + 1000 + en + 500 + ja; MP3 delay and padding only add
    let speech_ms = 2 * (synthesizer.tone_ms("Hello") + synthesizer.tone_ms("こんにちは"));
    let expected_ms = (100 + 500 + 1000 + 500 + speech_ms) as i64;
    let actual_ms = decode_file(&output_path)?.duration().as_millis() as i64;
    assert!(
        actual_ms >= expected_ms - 5 && actual_ms <= expected_ms + 700,
        "expected about {} ms, got {} ms",
        expected_ms,
        actual_ms
    );

    assert!(common::temp_artifacts(output_path.parent().unwrap()).is_empty());

    Ok(())
}

/// More loops make a longer file
#[tokio::test]
async fn test_process_moreLoops_shouldProduceLongerAudio() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (pipeline, _) = common::working_pipeline(TimelineOptions::default());

    let one = temp_dir.path().join("one.mp3");
    let three = temp_dir.path().join("three.mp3");
    pipeline.process(&hello_row(one.clone(), 1)).await?;
    pipeline.process(&hello_row(three.clone(), 3)).await?;

    let one_ms = decode_file(&one)?.duration().as_millis();
    let three_ms = decode_file(&three)?.duration().as_millis();

    // Two extra loops add at least two loop gaps and two sentence gaps
    assert!(three_ms >= one_ms + 2 * (1000 + 500), "{} vs {}", one_ms, three_ms);

    Ok(())
}

/// Disabled rows have no side effects
#[tokio::test]
async fn test_process_disabledRow_shouldDoNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_path = temp_dir.path().join("missing_dir").join("skip.mp3");
    let (pipeline, synthesizer) = common::working_pipeline(TimelineOptions::default());

    let mut row = hello_row(output_path.clone(), 1);
    row.enabled = false;

    assert_eq!(pipeline.process(&row).await?, RowOutcome::Skipped);
    assert!(!output_path.exists());
    assert!(!output_path.parent().unwrap().exists());
    assert_eq!(synthesizer.request_count(), 0);

    Ok(())
}

/// Directory creation is idempotent across runs on the same path
#[test]
fn test_process_twiceOnSamePath_shouldSucceedBothTimes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_path = temp_dir.path().join("a").join("b").join("again.mp3");
    let (pipeline, _) = common::working_pipeline(TimelineOptions::default());
    let row = hello_row(output_path.clone(), 1);

    let first = tokio_test::block_on(pipeline.process(&row));
    let second = tokio_test::block_on(pipeline.process(&row));

    assert!(first.is_ok(), "{:?}", first);
    assert!(second.is_ok(), "{:?}", second);
    assert!(output_path.is_file());

    Ok(())
}

/// A tagging failure still removes the temporary clips
#[tokio::test]
async fn test_process_tagFailure_shouldCleanUpTempClips() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_path = temp_dir.path().join("tagless.mp3");
    let pipeline = common::mock_pipeline(
        Arc::new(MockSynthesizer::working()),
        Arc::new(common::FailingTagWriter),
        TimelineOptions::default(),
    );

    let result = pipeline.process(&hello_row(output_path.clone(), 1)).await;

    assert!(matches!(result, Err(PipelineError::Tag(_))));
    assert!(common::temp_artifacts(temp_dir.path()).is_empty());

    Ok(())
}

/// A synthesis failure after the first clip leaves nothing behind
#[tokio::test]
async fn test_process_secondSynthesisFails_shouldLeaveNoFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_path = temp_dir.path().join("broken.mp3");
    let pipeline = common::mock_pipeline(
        Arc::new(MockSynthesizer::intermittent(2)),
        Arc::new(Id3TagWriter),
        TimelineOptions::default(),
    );

    let result = pipeline.process(&hello_row(output_path.clone(), 1)).await;

    assert!(matches!(result, Err(PipelineError::Synthesis(_))));
    assert!(!output_path.exists());
    assert!(common::temp_artifacts(temp_dir.path()).is_empty());

    Ok(())
}

/// Empty text is rejected before anything is written
#[tokio::test]
async fn test_process_emptyText_shouldBeSynthesisError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (pipeline, _) = common::working_pipeline(TimelineOptions::default());

    let mut row = hello_row(temp_dir.path().join("empty.mp3"), 1);
    row.japanese_text = String::new();

    let result = pipeline.process(&row).await;
    assert!(matches!(result, Err(PipelineError::Synthesis(_))));
    assert!(common::temp_artifacts(temp_dir.path()).is_empty());

    Ok(())
}
