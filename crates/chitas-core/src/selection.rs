use crate::calendar::{CalendarItem, CalendarSnapshot};

/// The feed items that get a fixed slot on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    TorahPortion,
    Tanya,
    RambamOneChapter,
    RambamThreeChapters,
}

impl Category {
    pub fn all() -> [Category; 4] {
        [
            Category::TorahPortion,
            Category::Tanya,
            Category::RambamOneChapter,
            Category::RambamThreeChapters,
        ]
    }

    /// English title the feed uses for this category.
    pub fn canonical_title(&self) -> &'static str {
        match self {
            Category::TorahPortion => "Parashat Hashavua",
            Category::Tanya => "Tanya Yomi",
            Category::RambamOneChapter => "Daily Rambam",
            Category::RambamThreeChapters => "Daily Rambam (3 Chapters)",
        }
    }

    pub fn from_title(title: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|category| category.canonical_title() == title)
    }
}

/// A snapshot's items routed into the four fixed slots plus everything else
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySelection {
    pub torah_portion: Option<CalendarItem>,
    pub tanya: Option<CalendarItem>,
    pub rambam_one: Option<CalendarItem>,
    pub rambam_three: Option<CalendarItem>,
    /// Unrecognized titles, in feed order.
    pub others: Vec<CalendarItem>,
}

impl DailySelection {
    pub fn get(&self, category: Category) -> Option<&CalendarItem> {
        match category {
            Category::TorahPortion => self.torah_portion.as_ref(),
            Category::Tanya => self.tanya.as_ref(),
            Category::RambamOneChapter => self.rambam_one.as_ref(),
            Category::RambamThreeChapters => self.rambam_three.as_ref(),
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut Option<CalendarItem> {
        match category {
            Category::TorahPortion => &mut self.torah_portion,
            Category::Tanya => &mut self.tanya,
            Category::RambamOneChapter => &mut self.rambam_one,
            Category::RambamThreeChapters => &mut self.rambam_three,
        }
    }
}

/// Route items by exact English title. The first item for a category wins;
/// later duplicates of a known title are dropped rather than listed as others.
pub fn select(snapshot: &CalendarSnapshot) -> DailySelection {
    let mut selection = DailySelection::default();

    for item in &snapshot.items {
        match Category::from_title(item.english_title()) {
            Some(category) => {
                let slot = selection.slot_mut(category);
                if slot.is_none() {
                    *slot = Some(item.clone());
                }
            }
            None => selection.others.push(item.clone()),
        }
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Bilingual;

    fn item(title: &str, reference: &str) -> CalendarItem {
        CalendarItem {
            title: Bilingual::english(title),
            display_value: Bilingual::english(reference),
            reference: Some(reference.to_string()),
            ..CalendarItem::default()
        }
    }

    fn snapshot(items: Vec<CalendarItem>) -> CalendarSnapshot {
        CalendarSnapshot {
            date: "2024-01-15".to_string(),
            localized_date: "2024-01-15".to_string(),
            items,
        }
    }

    #[test]
    fn test_known_titles_route_to_slots() {
        let selection = select(&snapshot(vec![
            item("Parashat Hashavua", "Exodus 10:1-13:16"),
            item("Daf Yomi", "Yevamot 7"),
            item("Tanya Yomi", "Tanya, Part I 3"),
            item("Daily Rambam", "Mishneh Torah, Prayer 1"),
            item("Daily Rambam (3 Chapters)", "Mishneh Torah, Prayer 1-3"),
        ]));

        assert_eq!(
            selection.get(Category::TorahPortion).and_then(|i| i.reference()),
            Some("Exodus 10:1-13:16")
        );
        assert_eq!(
            selection.get(Category::Tanya).and_then(|i| i.reference()),
            Some("Tanya, Part I 3")
        );
        assert_eq!(
            selection.get(Category::RambamOneChapter).and_then(|i| i.reference()),
            Some("Mishneh Torah, Prayer 1")
        );
        assert_eq!(
            selection.get(Category::RambamThreeChapters).and_then(|i| i.reference()),
            Some("Mishneh Torah, Prayer 1-3")
        );
        assert_eq!(selection.others.len(), 1);
        assert_eq!(selection.others[0].english_title(), "Daf Yomi");
    }

    #[test]
    fn test_missing_category_is_empty() {
        let selection = select(&snapshot(vec![item("Tanya Yomi", "Tanya, Part I 3")]));
        assert!(selection.get(Category::TorahPortion).is_none());
        assert!(selection.others.is_empty());
    }

    #[test]
    fn test_titles_match_exactly() {
        let selection = select(&snapshot(vec![item("daily rambam", "x")]));
        assert!(selection.get(Category::RambamOneChapter).is_none());
        assert_eq!(selection.others.len(), 1);
    }

    #[test]
    fn test_first_match_wins_and_duplicates_are_dropped() {
        let selection = select(&snapshot(vec![
            item("Tanya Yomi", "first"),
            item("Tanya Yomi", "second"),
        ]));
        assert_eq!(
            selection.get(Category::Tanya).and_then(|i| i.reference()),
            Some("first")
        );
        assert!(selection.others.is_empty());
    }
}
