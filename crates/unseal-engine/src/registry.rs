//! Process-wide engine SDK slot
//!
//! The SDK registers itself here once per process; everything else only
//! reads. Published values are immutable, so concurrent readers need no
//! coordination beyond the atomic slot itself.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::api::EngineSdk;

struct Registration {
    sdk: Arc<dyn EngineSdk>,
}

static SLOT: ArcSwapOption<Registration> = ArcSwapOption::const_empty();

/// The registered SDK, if any.
pub fn current() -> Option<Arc<dyn EngineSdk>> {
    SLOT.load_full().map(|r| r.sdk.clone())
}

pub fn is_registered() -> bool {
    SLOT.load().is_some()
}

/// Publish a loaded SDK. The first registration wins; later calls return
/// false and leave the existing SDK in place, so a redundant bootstrap can
/// never swap the SDK out from under live engine instances.
pub fn register(sdk: Arc<dyn EngineSdk>) -> bool {
    let mut installed = false;
    SLOT.rcu(|slot| {
        if slot.is_some() {
            installed = false;
            slot.clone()
        } else {
            installed = true;
            Some(Arc::new(Registration { sdk: sdk.clone() }))
        }
    });
    installed
}

/// Empty the slot. Test-isolation hook only; the slot is never reset during
/// normal operation.
pub fn clear() {
    SLOT.store(None);
}
