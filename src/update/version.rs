use std::cmp::Ordering;

/// Compares two dotted version strings component by component.
///
/// Components are read as their leading digits, so `"1.2rc1"` reads as
/// `1.2` and a component without digits counts as `0`. A missing component
/// counts as `0` too, which makes `"1.2"` equal to `"1.2.0"`.
pub fn version_compare(a: &str, b: &str) -> Ordering {
    let a: Vec<u64> = components(a).collect();
    let b: Vec<u64> = components(b).collect();

    (0..a.len().max(b.len()))
        .map(|i| {
            let left = a.get(i).copied().unwrap_or(0);
            let right = b.get(i).copied().unwrap_or(0);
            left.cmp(&right)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Whether `latest` is strictly newer than `current`
pub fn is_newer(latest: &str, current: &str) -> bool {
    version_compare(latest, current).is_gt()
}

fn components(version: &str) -> impl Iterator<Item = u64> + '_ {
    version.trim().split('.').map(leading_number)
}

fn leading_number(component: &str) -> u64 {
    let digits = component
        .find(|c: char| !c.is_ascii_digit())
        .map_or(component, |end| &component[..end]);
    digits.parse().unwrap_or(0)
}
