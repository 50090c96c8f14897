use crate::models::{Match, SwipeResponse};

/// Match carried by a swipe response, if any
///
/// The backend is the only authority on reciprocity; nothing is derived
/// from local data.
#[inline]
pub fn has_match(response: &SwipeResponse) -> Option<&Match> {
    response.matched.as_ref()
}
