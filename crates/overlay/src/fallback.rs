use catalog::LocationSet;

/// One plain hyperlink standing in for a pin when the 3D backend is
/// unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackLink {
    pub text: String,
    pub href: String,
}

/// Builds the static link list shown instead of the canvas when the GPU
/// backend cannot be initialized: one link per location, catalog order,
/// visible text and target URL from the same data the pins use.
pub fn fallback_links(locations: &LocationSet) -> Vec<FallbackLink> {
    locations
        .iter()
        .map(|loc| FallbackLink {
            text: if loc.location_name.trim().is_empty() {
                loc.id.clone()
            } else {
                loc.location_name.clone()
            },
            href: loc.branch_url.clone(),
        })
        .collect()
}
