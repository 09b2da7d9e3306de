use atomic_float::AtomicF32;
use nih_plug::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;

use crate::params::{ParamId, ParameterSet, ParameterSource};

/// Host-agnostic parameter store: one atomic per parameter so the control thread can write while
/// the audio thread reads, without locks and without torn values.
///
/// The plugin itself reads from nih_plug's params; this store is what standalone hosts and the
/// tests drive the engine with.
pub struct AtomicParameterStore {
    values: [AtomicF32; 5],
}

/// On-disk shape of the saved state. The root key tags the blob so foreign data is rejected.
#[derive(Debug, Serialize, Deserialize)]
struct SavedState {
    #[serde(rename = "PARAMETERS")]
    parameters: BTreeMap<String, f32>,
}

fn slot(id: ParamId) -> usize {
    match id {
        ParamId::FilterFreq => 0,
        ParamId::FilterResonance => 1,
        ParamId::LfoDepth => 2,
        ParamId::LfoRate => 3,
        ParamId::FilterGain => 4,
    }
}

impl AtomicParameterStore {
    pub fn new() -> Self {
        Self {
            values: ParamId::ALL.map(|id| AtomicF32::new(id.default_value())),
        }
    }

    pub fn get(&self, id: ParamId) -> f32 {
        self.values[slot(id)].load(Ordering::Relaxed)
    }

    /// Writes a new value, clamped into the parameter's declared range.
    pub fn set(&self, id: ParamId, value: f32) {
        self.values[slot(id)].store(id.clamp(value), Ordering::Relaxed);
    }

    pub fn reset_to_defaults(&self) {
        for id in ParamId::ALL {
            self.set(id, id.default_value());
        }
    }

    pub fn snapshot(&self) -> ParameterSet {
        ParameterSet::read_from(self)
    }

    /// Serializes the current values. LFO phase and filter state are not part of this.
    pub fn save_state(&self) -> Vec<u8> {
        let state = SavedState {
            parameters: ParamId::ALL
                .into_iter()
                .map(|id| (id.as_str().to_owned(), self.get(id)))
                .collect(),
        };

        // A string-keyed map of plain floats always serializes
        serde_json::to_vec(&state).unwrap_or_default()
    }

    /// Restores values from [`save_state()`][Self::save_state()] output. A blob that cannot be
    /// decoded puts every parameter back to its default, a missing entry puts that one parameter
    /// back to its default.
    pub fn load_state(&self, data: &[u8]) {
        let state = match serde_json::from_slice::<SavedState>(data) {
            Ok(state) => state,
            Err(err) => {
                nih_warn!("Could not decode saved state, falling back to defaults: {}", err);
                self.reset_to_defaults();
                return;
            }
        };

        for id in ParamId::ALL {
            match state.parameters.get(id.as_str()) {
                Some(value) => self.set(id, *value),
                None => {
                    nih_warn!("Saved state has no value for {}, using default", id.as_str());
                    self.set(id, id.default_value());
                }
            }
        }
    }
}

impl Default for AtomicParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterSource for AtomicParameterStore {
    fn read_named(&self, id: ParamId) -> f64 {
        self.get(id) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_holds_defaults() {
        let store = AtomicParameterStore::new();
        assert_eq!(store.snapshot(), ParameterSet::default());
    }

    #[test]
    fn set_clamps_into_range() {
        let store = AtomicParameterStore::new();
        store.set(ParamId::FilterFreq, 50000.0);
        store.set(ParamId::LfoDepth, -3.0);

        assert_eq!(store.get(ParamId::FilterFreq), 20000.0);
        assert_eq!(store.get(ParamId::LfoDepth), 0.0);
    }

    #[test]
    fn state_round_trips_into_a_fresh_store() {
        let store = AtomicParameterStore::new();
        store.set(ParamId::FilterFreq, 2500.0);
        store.set(ParamId::FilterResonance, 3.3);
        store.set(ParamId::LfoDepth, 420.0);
        store.set(ParamId::LfoRate, 0.7);
        store.set(ParamId::FilterGain, 6.5);

        let blob = store.save_state();
        let restored = AtomicParameterStore::new();
        restored.load_state(&blob);

        for id in ParamId::ALL {
            assert!((restored.get(id) - store.get(id)).abs() < 1e-6, "{}", id.as_str());
        }
    }

    #[test]
    fn garbage_state_falls_back_to_defaults() {
        let store = AtomicParameterStore::new();
        store.set(ParamId::FilterGain, 9.0);
        store.load_state(b"\x00\x01not json");

        assert_eq!(store.snapshot(), ParameterSet::default());
    }

    #[test]
    fn wrong_root_tag_falls_back_to_defaults() {
        let store = AtomicParameterStore::new();
        store.set(ParamId::LfoRate, 12.0);
        store.load_state(br#"{"OTHER": {"LFO_RATE": 12.0}}"#);

        assert_eq!(store.get(ParamId::LfoRate), ParamId::LfoRate.default_value());
    }

    #[test]
    fn missing_keys_use_their_defaults() {
        let store = AtomicParameterStore::new();
        store.set(ParamId::LfoDepth, 700.0);
        store.load_state(br#"{"PARAMETERS": {"FILTER_FREQ": 440.0}}"#);

        assert_eq!(store.get(ParamId::FilterFreq), 440.0);
        assert_eq!(store.get(ParamId::LfoDepth), ParamId::LfoDepth.default_value());
    }

    #[test]
    fn loaded_values_are_clamped() {
        let store = AtomicParameterStore::new();
        store.load_state(br#"{"PARAMETERS": {"FILTER_RESONANCE": 99.0}}"#);

        assert_eq!(store.get(ParamId::FilterResonance), 10.0);
    }
}
