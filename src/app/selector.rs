//! Repository list semantics: which entry is selected and which can be clicked.

use super::orchestrator::Snapshot;
use crate::types::Repository;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectorItem {
    pub repository: Repository,
    pub selected: bool,
    pub enabled: bool,
}

/// One item per catalog entry. While a request is loading, only the selected
/// repository stays enabled.
pub fn items(catalog: &[Repository], snapshot: &Snapshot) -> Vec<SelectorItem> {
    let loading = snapshot.is_loading();
    catalog
        .iter()
        .map(|repo| {
            let selected = *repo == snapshot.selection;
            SelectorItem {
                repository: *repo,
                selected,
                enabled: selected || !loading,
            }
        })
        .collect()
}

/// The repository a click on `item` should dispatch, if any.
pub fn click(item: &SelectorItem) -> Option<Repository> {
    (item.enabled && !item.selected).then_some(item.repository)
}
