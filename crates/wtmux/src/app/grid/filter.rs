use crate::domain::panel::GridPanel;

/// Filtered view of the grid panels, keyed by filter text and data
/// generation.
///
/// Holds positions into the unfiltered vectors rather than clones.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FilterCache {
    /// Positions into the available vector.
    pub filtered_available: Vec<usize>,
    /// Positions into the sessions+recent vector.
    pub filtered_panels: Vec<usize>,
    /// How many of `filtered_panels` come from the sessions section.
    pub filtered_session_count: usize,
    filter_text: String,
    generation: u64,
}

impl FilterCache {
    /// Builds the filtered view for `filter_text` over one data generation.
    ///
    /// `panels` holds sessions followed by recent entries, split at
    /// `session_count`.
    pub fn build(
        filter_text: &str,
        generation: u64,
        panels: &[GridPanel],
        session_count: usize,
        available: &[GridPanel],
    ) -> Self {
        let needle = filter_text.to_lowercase();
        let filtered_panels: Vec<usize> = matching_positions(panels, &needle);
        let filtered_session_count = filtered_panels
            .iter()
            .take_while(|position| **position < session_count)
            .count();

        Self {
            filtered_available: matching_positions(available, &needle),
            filtered_panels,
            filtered_session_count,
            filter_text: filter_text.to_string(),
            generation,
        }
    }

    /// Returns whether this cache was built for `filter_text` and
    /// `generation`.
    pub fn is_current(&self, filter_text: &str, generation: u64) -> bool {
        self.generation == generation && self.filter_text == filter_text
    }
}

fn matching_positions(panels: &[GridPanel], needle: &str) -> Vec<usize> {
    panels
        .iter()
        .enumerate()
        .filter(|(_, panel)| panel.matches_filter(needle))
        .map(|(position, _)| position)
        .collect()
}
