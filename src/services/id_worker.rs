//! Snowflake-style id generator for externally-visible artifact ids.
//!
//! Layout: 41 bits of milliseconds since a fixed epoch, 10 bits of instance
//! id, 12 bits of per-millisecond sequence. Ids are monotonically distinct
//! for a given instance and render as decimal strings.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const EPOCH_MS: u64 = 1_288_834_974_657;
const INSTANCE_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
const MAX_INSTANCE: u64 = (1 << INSTANCE_BITS) - 1;

pub struct IdWorker {
    instance_id: u64,
    state: Mutex<State>,
}

struct State {
    last_timestamp: u64,
    sequence: u64,
}

impl IdWorker {
    /// `instance_id` must fit in 10 bits; values above are masked.
    #[must_use]
    pub fn new(instance_id: u64) -> Self {
        Self {
            instance_id: instance_id & MAX_INSTANCE,
            state: Mutex::new(State {
                last_timestamp: 0,
                sequence: 0,
            }),
        }
    }

    /// Next id as a decimal string.
    pub fn next_id(&self) -> String {
        let mut state = self.state.lock().expect("id worker mutex poisoned");

        let mut now = current_millis();
        if now == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // Sequence exhausted for this millisecond, spin to the next
                while now <= state.last_timestamp {
                    now = current_millis();
                }
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = now;

        let id = ((now - EPOCH_MS.min(now)) << (INSTANCE_BITS + SEQUENCE_BITS))
            | (self.instance_id << SEQUENCE_BITS)
            | state.sequence;

        id.to_string()
    }
}

fn current_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(0))
}
