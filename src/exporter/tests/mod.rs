use super::test_helpers::*;
use super::*;
use crate::error::{ArchiveError, Error};
use crate::types::{Album, Event, JobId, JobState, Media};
use std::sync::Arc;


/// States announced through `StateChanged` events, in order
fn announced_states(events: &[Event]) -> Vec<JobState> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::StateChanged { state, .. } => Some(*state),
            _ => None,
        })
        .collect()
}

/// Percentages announced through `Progress` events, in order
fn announced_percents(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect()
}
