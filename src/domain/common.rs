use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// First item carrying `id`.
pub fn find_by_id<T: Identifiable>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Enumerations that expose a fixed, human-readable label per variant.
pub trait DisplayName {
    fn display_name(&self) -> &'static str;
}

/// Case-insensitive lookup of a variant by its label or identifier-style name.
pub(crate) fn parse_by_name<T>(candidates: &[T], raw: &str) -> Option<T>
where
    T: DisplayName + Copy + std::fmt::Debug,
{
    let needle = normalize(raw);
    candidates.iter().copied().find(|candidate| {
        normalize(candidate.display_name()) == needle
            || normalize(&format!("{candidate:?}")) == needle
    })
}

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
