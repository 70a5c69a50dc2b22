/*!
 * Tests for timeline layout and rendering
 */

use vocaboost::app_config::TimelineOptions;
use vocaboost::audio::{AudioClip, AudioTimelineBuilder, Language, Segment, TimelinePlan, OPENING_MARGIN_MS};

fn options(japanese_first: bool, sentence_ms: u32, loop_ms: u32) -> TimelineOptions {
    TimelineOptions {
        japanese_first,
        gap_between_sentences_ms: sentence_ms,
        gap_between_loops_ms: loop_ms,
    }
}

/// Every unit starts with the configured first language, for any loop count
#[test]
fn test_plan_everyUnit_shouldStartWithConfiguredLanguage() {
    for japanese_first in [false, true] {
        let first = if japanese_first { Language::Japanese } else { Language::English };
        for loop_count in 1..=5 {
            let plan = TimelinePlan::new(&options(japanese_first, 500, 1000), loop_count).unwrap();
            let segments = plan.segments();

            // The margin and every loop gap are followed by the first language
            for (index, segment) in segments.iter().enumerate() {
                if matches!(segment, Segment::OpeningMargin | Segment::LoopGap(_)) {
                    assert_eq!(segments[index + 1], Segment::Speech(first));
                }
            }
        }
    }
}

/// Pairs equal loop count, gaps equal loop count minus one
#[test]
fn test_plan_counts_shouldFollowLoopCount() {
    // Equal gap lengths must not confuse the counts
    let plan = TimelinePlan::new(&options(false, 700, 700), 4).unwrap();
    assert_eq!(plan.speech_count(Language::English), 4);
    assert_eq!(plan.speech_count(Language::Japanese), 4);
    assert_eq!(plan.loop_gap_count(), 3);
    assert_eq!(plan.segments().first(), Some(&Segment::OpeningMargin));
}

/// The end-to-end scenario layout with default options
#[test]
fn test_plan_defaultOptionsTwoLoops_shouldMatchExpectedLayout() {
    let plan = TimelinePlan::new(&TimelineOptions::default(), 2).unwrap();
    assert_eq!(
        plan.segments(),
        &[
            Segment::OpeningMargin,
            Segment::Speech(Language::English),
            Segment::SentenceGap(500),
            Segment::Speech(Language::Japanese),
            Segment::LoopGap(1000),
            Segment::Speech(Language::English),
            Segment::SentenceGap(500),
            Segment::Speech(Language::Japanese),
        ]
    );
    assert_eq!(plan.silence_ms(), (OPENING_MARGIN_MS + 500 + 1000 + 500) as u64);
}

/// Rendered duration is the silence plus every speech segment
#[test]
fn test_build_duration_shouldSumAllSegments() {
    let english = AudioClip::silent(300, 24_000);
    let japanese = AudioClip::silent(450, 24_000);

    let clip = AudioTimelineBuilder::new(options(true, 200, 800))
        .build(english, japanese, 3)
        .unwrap();

    let expected_ms = 100 + 3 * (300 + 200 + 450) + 2 * 800;
    assert_eq!(clip.len(), expected_ms * 24);
    assert_eq!(clip.sample_rate(), 24_000);
}

/// Zero gaps simply join the clips
#[test]
fn test_build_withZeroGaps_shouldOnlyKeepMargin() {
    let english = AudioClip::new(vec![5; 3], 1_000);
    let japanese = AudioClip::new(vec![6; 2], 1_000);

    let clip = AudioTimelineBuilder::new(options(false, 0, 0))
        .build(english, japanese, 2)
        .unwrap();

    let mut expected = vec![0i16; 100];
    expected.extend([5, 5, 5, 6, 6, 5, 5, 5, 6, 6]);
    assert_eq!(clip.samples(), expected.as_slice());
}
