//! Listing filters for posts.
//!
//! The browse page runs two selectors side by side: a normal one for
//! series posts and an event one for special-event posts. A post passes a
//! facet when nothing is selected there or when it lists at least one of the
//! selected values. A post that lists nothing for a filtered facet is
//! excluded.

use crate::selection::{ContentSelection, Selection};
use crate::{Facet, FacetValue, Mode};
use serde::{Deserialize, Serialize};

/// The facet values a post was published with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostContent {
    /// Set for posts tied to a special event.
    pub event_id: Option<i64>,
    #[serde(flatten)]
    pub content: ContentSelection,
}

impl PostContent {
    pub fn is_event(&self) -> bool {
        self.event_id.is_some()
    }

    pub fn values(&self, facet: Facet) -> Vec<FacetValue> {
        self.content.values().filter(|value| value.facet() == facet).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostTab {
    #[default]
    All,
    Series,
    Event,
}

/// Matches posts against the two browse selections.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    series: Selection,
    event: Selection,
}

impl PostFilter {
    /// `series` is read with the normal facets, `event` with the event facets
    /// only; anything else in them is ignored.
    pub fn new(series: &ContentSelection, event: &ContentSelection) -> Self {
        PostFilter {
            series: Selection::from(&Selection::from(series).to_content(Mode::Normal)),
            event: Selection::from(&Selection::from(event).to_content(Mode::Event)),
        }
    }

    pub fn matches(&self, tab: PostTab, post: &PostContent) -> bool {
        match tab {
            PostTab::Series => !post.is_event() && passes(&self.series, Mode::Normal, post),
            PostTab::Event => post.is_event() && passes(&self.event, Mode::Event, post),
            PostTab::All => self.matches(PostTab::Series, post) || self.matches(PostTab::Event, post),
        }
    }

    pub fn apply<'a>(&self, tab: PostTab, posts: &'a [PostContent]) -> Vec<&'a PostContent> {
        let kept: Vec<&PostContent> = posts.iter().filter(|post| self.matches(tab, post)).collect();
        tracing::debug!(?tab, total = posts.len(), kept = kept.len(), "filtered posts");
        kept
    }
}

fn passes(selection: &Selection, mode: Mode, post: &PostContent) -> bool {
    mode.facets().iter_facets().all(|facet| {
        let wanted = selection.get(facet);
        if wanted.is_empty() {
            return true;
        }
        post.values(facet).iter().any(|value| wanted.contains(value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryCode;

    fn series_post(series: &[i64], cars: &[i64]) -> PostContent {
        PostContent {
            event_id: None,
            content: ContentSelection { series_ids: series.to_vec(), car_ids: cars.to_vec(), ..Default::default() },
        }
    }

    fn event_post(classes: &[i64]) -> PostContent {
        PostContent {
            event_id: Some(7),
            content: ContentSelection { car_class_ids: classes.to_vec(), ..Default::default() },
        }
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = PostFilter::default();
        let posts = [series_post(&[1], &[]), event_post(&[5])];
        assert_eq!(filter.apply(PostTab::All, &posts).len(), 2);
        assert_eq!(filter.apply(PostTab::Series, &posts), vec![&posts[0]]);
        assert_eq!(filter.apply(PostTab::Event, &posts), vec![&posts[1]]);
    }

    #[test]
    fn filtered_facets_require_a_listed_value() {
        let cars = ContentSelection { car_ids: vec![100], ..Default::default() };
        let filter = PostFilter::new(&cars, &Default::default());
        // a post without cars cannot satisfy a car filter
        assert!(!filter.matches(PostTab::Series, &series_post(&[1], &[])));
        assert!(filter.matches(PostTab::Series, &series_post(&[], &[100])));
        assert!(filter.matches(PostTab::Series, &series_post(&[1], &[100, 101])));
        assert!(!filter.matches(PostTab::Series, &series_post(&[1], &[101])));
    }

    #[test]
    fn series_constraints_never_apply_to_event_posts() {
        let series = ContentSelection {
            categories: vec![CategoryCode::parse("oval").unwrap()],
            series_ids: vec![1],
            ..Default::default()
        };
        let event = ContentSelection { car_class_ids: vec![5], series_ids: vec![99], ..Default::default() };
        let filter = PostFilter::new(&series, &event);

        assert!(filter.matches(PostTab::All, &event_post(&[5])));
        assert!(!filter.matches(PostTab::All, &event_post(&[6])));
        assert!(!filter.matches(PostTab::All, &series_post(&[2], &[])));
        // series 1 alone is not enough while a category is selected
        assert!(!filter.matches(PostTab::All, &series_post(&[1], &[])));

        let mut oval_post = series_post(&[1], &[]);
        oval_post.content.categories.push(CategoryCode::parse("oval").unwrap());
        assert!(filter.matches(PostTab::All, &oval_post));
    }

    #[test]
    fn reads_posts_from_json() {
        let post: PostContent = serde_json::from_str(r#"{"event_id": 3, "track_ids": [9]}"#).unwrap();
        assert!(post.is_event());
        assert_eq!(post.values(Facet::Track), vec![FacetValue::Track(9)]);
        assert!(post.values(Facet::Car).is_empty());
    }
}
