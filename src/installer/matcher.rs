//! Asset path matching
//!
//! The restorer places tool assets under `tools/<framework>/<runtime>/...`
//! but callers only know the path relative to that folder. A candidate
//! matches when it is exactly three segments longer than the target, starts
//! with `tools`, and ends with the target's segments.

/// Leading segment of every tool asset path
const TOOLS_SEGMENT: &str = "tools";

/// Segments between the asset root and the relative path: tools, framework, runtime
const PLATFORM_SEGMENTS: usize = 3;

fn split_segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\']).collect()
}

/// Check whether `candidate` is `target` placed under `tools/<framework>/<runtime>/`
pub fn matches(candidate: &str, target: &str) -> bool {
    let candidate_segments = split_segments(candidate);
    let target_segments = split_segments(target);

    if target_segments.is_empty() {
        return false;
    }

    if candidate_segments.len() != target_segments.len() + PLATFORM_SEGMENTS {
        return false;
    }

    if candidate_segments[0] != TOOLS_SEGMENT {
        return false;
    }

    candidate_segments[PLATFORM_SEGMENTS..] == target_segments[..]
}

/// Find the asset matching `target` in a restore's asset listing
pub fn find_asset<'a, I>(assets: I, target: &str) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    assets
        .into_iter()
        .map(String::as_str)
        .find(|candidate| matches(candidate, target))
}
