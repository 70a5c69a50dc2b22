/*!
 * Timeline assembly.
 *
 * A drill file is laid out as
 *
 * ```text
 * margin, first, sentence gap, second, [loop gap, first, sentence gap, second] x (loops - 1)
 * ```
 *
 * where `first`/`second` are the English and Japanese clips in the configured
 * order. The layout is computed as a [`TimelinePlan`] first so it can be
 * inspected without any audio, then rendered into a single [`AudioClip`].
 */

use super::{samples_for, AudioClip};
use crate::app_config::TimelineOptions;
use crate::errors::AudioError;

/// Silence at the very start of every file
pub const OPENING_MARGIN_MS: u32 = 100;

/// Largest number of loops a single file may contain
pub const MAX_LOOP_COUNT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Japanese,
}

/// One piece of a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    OpeningMargin,
    SentenceGap(u32),
    LoopGap(u32),
    Speech(Language),
}

/// Ordered list of segments for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelinePlan {
    segments: Vec<Segment>,
}

impl TimelinePlan {
    pub fn new(options: &TimelineOptions, loop_count: u32) -> Result<Self, AudioError> {
        if loop_count == 0 || loop_count > MAX_LOOP_COUNT {
            return Err(AudioError::InvalidLoopCount(loop_count));
        }

        let (first, second) = if options.japanese_first {
            (Language::Japanese, Language::English)
        } else {
            (Language::English, Language::Japanese)
        };

        let mut segments = vec![Segment::OpeningMargin];
        for index in 0..loop_count {
            if index > 0 {
                segments.push(Segment::LoopGap(options.gap_between_loops_ms));
            }
            segments.push(Segment::Speech(first));
            segments.push(Segment::SentenceGap(options.gap_between_sentences_ms));
            segments.push(Segment::Speech(second));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of speech segments for `language`
    pub fn speech_count(&self, language: Language) -> usize {
        self.segments
            .iter()
            .filter(|s| **s == Segment::Speech(language))
            .count()
    }

    /// Number of silences inserted between loops
    pub fn loop_gap_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::LoopGap(_)))
            .count()
    }

    /// Total silence in the plan, in milliseconds
    pub fn silence_ms(&self) -> u64 {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::OpeningMargin => OPENING_MARGIN_MS as u64,
                Segment::SentenceGap(ms) | Segment::LoopGap(ms) => *ms as u64,
                Segment::Speech(_) => 0,
            })
            .sum()
    }

    /// Render the plan with the given speech clips
    pub fn render(&self, english: &AudioClip, japanese: &AudioClip) -> Result<AudioClip, AudioError> {
        let sample_rate = english.sample_rate();
        if japanese.sample_rate() != sample_rate {
            return Err(AudioError::SampleRateMismatch {
                first: sample_rate,
                second: japanese.sample_rate(),
            });
        }

        let total = self.speech_count(Language::English) * english.len()
            + self.speech_count(Language::Japanese) * japanese.len()
            + samples_for(self.silence_ms().min(u32::MAX as u64) as u32, sample_rate);

        let mut timeline = AudioClip::new(Vec::with_capacity(total), sample_rate);
        for segment in &self.segments {
            match segment {
                Segment::OpeningMargin => timeline.append_silence(OPENING_MARGIN_MS),
                Segment::SentenceGap(ms) | Segment::LoopGap(ms) => timeline.append_silence(*ms),
                Segment::Speech(Language::English) => timeline.append(english)?,
                Segment::Speech(Language::Japanese) => timeline.append(japanese)?,
            }
        }

        Ok(timeline)
    }
}

/// Builds the combined clip of a row from its two speech clips
#[derive(Debug, Clone, Copy)]
pub struct AudioTimelineBuilder {
    options: TimelineOptions,
}

impl AudioTimelineBuilder {
    pub fn new(options: TimelineOptions) -> Self {
        Self { options }
    }

    pub fn build(&self, english: AudioClip, japanese: AudioClip, loop_count: u32) -> Result<AudioClip, AudioError> {
        TimelinePlan::new(&self.options, loop_count)?.render(&english, &japanese)
    }
}
