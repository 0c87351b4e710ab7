//! Hierarchical position codes
//!
//! Budget items carry no parent reference, so their dotted codes
//! (`01`, `01.02`, `01.02.03`, `01.02.03.04`) are rebuilt from the order of the
//! list every time they are needed. A code depends only on the items at or
//! before its position.
//!
//! [`code`] is the reference definition: it rescans the list backwards for each
//! item. [`codes`] walks the list once and yields identical strings; every
//! caller that needs the whole column uses it.

use std::collections::HashMap;

use crate::models::{BudgetItem, ItemLevel};

/// Code of a stage with no site before it
pub const FALLBACK_STAGE_CODE: &str = "01.01";
/// Code of a substage with no stage before it
pub const FALLBACK_SUBSTAGE_CODE: &str = "01.01.01";
/// Code of a service with no stage or substage before it
pub const FALLBACK_SERVICE_CODE: &str = "01.01.01.01";

fn segment(parent: Option<&str>, ordinal: usize) -> String {
    match parent {
        Some(parent) => format!("{}.{:02}", parent, ordinal),
        None => format!("{:02}", ordinal),
    }
}

fn is_service_parent(level: ItemLevel) -> bool {
    matches!(level, ItemLevel::Stage | ItemLevel::Substage)
}

/// Nearest index before `index` whose level satisfies `accept`
fn nearest_preceding(
    items: &[BudgetItem],
    index: usize,
    accept: impl Fn(ItemLevel) -> bool,
) -> Option<usize> {
    (0..index).rev().find(|&j| accept(items[j].level))
}

fn count_level(items: &[BudgetItem], level: ItemLevel) -> usize {
    items.iter().filter(|item| item.level == level).count()
}

/// Code of the stage or substage a service at `index` hangs from
fn service_parent_code(items: &[BudgetItem], index: usize) -> Option<String> {
    nearest_preceding(items, index, is_service_parent).and_then(|p| code(items, p))
}

/// Compute the code of the item at `index` from scratch
///
/// Returns `None` only when `index` is out of bounds.
pub fn code(items: &[BudgetItem], index: usize) -> Option<String> {
    let item = items.get(index)?;

    let code = match item.level {
        ItemLevel::Site => segment(None, count_level(&items[..=index], ItemLevel::Site)),
        ItemLevel::Stage => match nearest_preceding(items, index, |l| l == ItemLevel::Site) {
            Some(site) => segment(
                Some(&code(items, site)?),
                count_level(&items[site + 1..=index], ItemLevel::Stage),
            ),
            None => FALLBACK_STAGE_CODE.to_string(),
        },
        ItemLevel::Substage => match nearest_preceding(items, index, |l| l == ItemLevel::Stage) {
            Some(stage) => segment(
                Some(&code(items, stage)?),
                count_level(&items[stage + 1..=index], ItemLevel::Substage),
            ),
            None => FALLBACK_SUBSTAGE_CODE.to_string(),
        },
        ItemLevel::Service => match service_parent_code(items, index) {
            Some(parent) => {
                let siblings = (0..=index)
                    .filter(|&j| items[j].level == ItemLevel::Service)
                    .filter(|&j| service_parent_code(items, j).as_deref() == Some(parent.as_str()))
                    .count();
                segment(Some(&parent), siblings)
            }
            None => FALLBACK_SERVICE_CODE.to_string(),
        },
    };

    Some(code)
}

/// Running state of a single forward pass over the item list
#[derive(Debug, Default)]
struct CodeWalker {
    sites: usize,
    site: Option<String>,
    stages_since_site: usize,
    stage: Option<String>,
    substages_since_stage: usize,
    service_parent: Option<String>,
    services_by_parent: HashMap<String, usize>,
}

impl CodeWalker {
    fn next(&mut self, level: ItemLevel) -> String {
        match level {
            ItemLevel::Site => {
                self.sites += 1;
                self.stages_since_site = 0;
                let code = segment(None, self.sites);
                self.site = Some(code.clone());
                code
            }
            ItemLevel::Stage => {
                let code = match &self.site {
                    Some(site) => {
                        self.stages_since_site += 1;
                        segment(Some(site), self.stages_since_site)
                    }
                    None => FALLBACK_STAGE_CODE.to_string(),
                };
                self.substages_since_stage = 0;
                self.stage = Some(code.clone());
                self.service_parent = Some(code.clone());
                code
            }
            ItemLevel::Substage => {
                let code = match &self.stage {
                    Some(stage) => {
                        self.substages_since_stage += 1;
                        segment(Some(stage), self.substages_since_stage)
                    }
                    None => FALLBACK_SUBSTAGE_CODE.to_string(),
                };
                self.service_parent = Some(code.clone());
                code
            }
            ItemLevel::Service => match &self.service_parent {
                Some(parent) => {
                    let ordinal = self.services_by_parent.entry(parent.clone()).or_insert(0);
                    *ordinal += 1;
                    segment(Some(parent), *ordinal)
                }
                None => FALLBACK_SERVICE_CODE.to_string(),
            },
        }
    }
}

/// Codes for every item, in list order
pub fn codes(items: &[BudgetItem]) -> Vec<String> {
    let mut walker = CodeWalker::default();
    items.iter().map(|item| walker.next(item.level)).collect()
}
