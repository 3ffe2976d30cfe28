/// Type-to-filter branch list used by the create and adopt flows.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BranchPicker {
    pub branches: Vec<String>,
    pub filter: String,
    /// Set while the branch list is still being fetched.
    pub is_loading: bool,
    pub selected_index: usize,
}

impl BranchPicker {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn loaded(branches: Vec<String>) -> Self {
        Self {
            branches,
            ..Self::default()
        }
    }

    /// Returns the branches matching the filter, in list order.
    pub fn filtered(&self) -> Vec<&str> {
        let needle = self.filter.to_lowercase();

        self.branches
            .iter()
            .filter(|branch| branch.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Returns the highlighted branch, if the filter left any.
    pub fn selected(&self) -> Option<&str> {
        self.filtered().get(self.selected_index).copied()
    }

    pub fn push_filter_char(&mut self, character: char) {
        self.filter.push(character);
        self.selected_index = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.selected_index = 0;
    }

    pub fn next(&mut self) {
        let count = self.filtered().len();
        if count > 0 {
            self.selected_index = (self.selected_index + 1).min(count - 1);
        }
    }

    pub fn previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }
}
