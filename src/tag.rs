//! The tag tally: how many published posts carry each tag, shown as the
//! sidebar facet on the index page.

use std::collections::BTreeMap;

use gtmpl_derive::Gtmpl;

use crate::post::Post;

/// Counts the posts carrying each tag. The [`BTreeMap`] keeps iteration in
/// sorted tag order, which is the order the sidebar presents.
pub fn tally(posts: &[Post]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// A single sidebar entry: a tag name and the number of posts carrying it.
#[derive(Gtmpl)]
pub struct TagCount {
    pub name: String,
    pub count: u64,
}

/// Flattens a tally into template-ready [`TagCount`] entries, preserving the
/// tally's sorted order.
pub fn to_counts(tally: &BTreeMap<String, usize>) -> Vec<TagCount> {
    tally
        .iter()
        .map(|(name, count)| TagCount {
            name: name.clone(),
            count: *count as u64,
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn post(tags: &[&str]) -> Post {
        Post {
            title: String::new(),
            date: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            slug: String::new(),
            excerpt: String::new(),
            body: String::new(),
        }
    }

    #[test]
    fn test_tally_counts_across_posts() {
        let posts = vec![post(&["rust", "intro"]), post(&["rust"]), post(&[])];
        let tally = tally(&posts);
        assert_eq!(Some(&2), tally.get("rust"));
        assert_eq!(Some(&1), tally.get("intro"));
        assert_eq!(2, tally.len());
    }

    #[test]
    fn test_counts_sorted_by_name() {
        let posts = vec![post(&["zebra", "apple", "mango"])];
        let names: Vec<String> = to_counts(&tally(&posts))
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(vec!["apple", "mango", "zebra"], names);
    }
}
