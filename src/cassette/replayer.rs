//! Serves recorded interactions back in call order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

type Slot = (String, String);

/// Per `(port, method)` queues built from a cassette.
///
/// Interactions are ordered by `seq`, so hand-edited cassettes do not need to
/// list them in order.
pub struct CassetteReplayer {
    pending: HashMap<Slot, VecDeque<Interaction>>,
    served: HashMap<Slot, usize>,
}

impl CassetteReplayer {
    /// Build the replay queues for `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut ordered = cassette.interactions.clone();
        ordered.sort_by_key(|i| i.seq);

        let mut pending: HashMap<Slot, VecDeque<Interaction>> = HashMap::new();
        for interaction in ordered {
            let slot = (interaction.port.clone(), interaction.method.clone());
            pending.entry(slot).or_default().push_back(interaction);
        }
        Self { pending, served: HashMap::new() }
    }

    /// Number of interactions not yet served, across all ports.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.values().map(VecDeque::len).sum()
    }

    /// Take the next interaction recorded for `port`/`method`.
    ///
    /// # Errors
    ///
    /// Returns a description of the cassette contents when nothing is left
    /// for this pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<Interaction, String> {
        let slot = (port.to_string(), method.to_string());

        let Some(queue) = self.pending.get_mut(&slot) else {
            let mut known: Vec<String> =
                self.pending.keys().map(|(p, m)| format!("{p}.{m}")).collect();
            known.sort();
            return Err(format!(
                "Cassette exhausted: {port}.{method} was never recorded (cassette has: {})",
                known.join(", ")
            ));
        };

        let served = self.served.entry(slot).or_insert(0);
        match queue.pop_front() {
            Some(interaction) => {
                *served += 1;
                Ok(interaction)
            }
            None => Err(format!(
                "Cassette exhausted: {port}.{method} already replayed {served} recorded call(s)"
            )),
        }
    }
}
