//! Query engine over the published post collection
//!
//! A [`PostIndex`] is built from one full scan of the content store. It holds
//! the published posts newest first, plus secondary maps from lowercased tag
//! and category to positions in that list. Every query answers in the list
//! order, so an index lookup returns exactly what filtering the full list
//! would. The index is read-only; whoever owns it must rebuild it after a
//! mutation.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::content::Post;

/// Published posts with tag, category and slug lookups
#[derive(Debug, Clone, Default)]
pub struct PostIndex {
    posts: Vec<Post>,
    by_slug: IndexMap<String, usize>,
    by_tag: HashMap<String, Vec<usize>>,
    by_category: HashMap<String, Vec<usize>>,
}

/// One page of posts with navigation info
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated {
    pub posts: Vec<Post>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_posts: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PostIndex {
    /// Build an index from posts that are already filtered to published and
    /// sorted newest first
    pub fn new(posts: Vec<Post>) -> Self {
        let mut by_slug = IndexMap::with_capacity(posts.len());
        let mut by_tag: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();

        for (i, post) in posts.iter().enumerate() {
            by_slug.insert(post.slug.clone(), i);
            for tag in &post.tags {
                push_unique(by_tag.entry(tag.to_lowercase()).or_default(), i);
            }
            if let Some(category) = post.category.as_deref().filter(|c| !c.is_empty()) {
                push_unique(by_category.entry(category.to_lowercase()).or_default(), i);
            }
        }

        tracing::debug!(
            "Indexed {} posts, {} tags, {} categories",
            posts.len(),
            by_tag.len(),
            by_category.len()
        );

        Self {
            posts,
            by_slug,
            by_tag,
            by_category,
        }
    }

    /// All published posts, newest first
    pub fn all(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Post by slug; a trailing `.md` is ignored
    pub fn get(&self, slug: &str) -> Option<&Post> {
        let slug = slug.strip_suffix(".md").unwrap_or(slug);
        self.by_slug.get(slug).map(|&i| &self.posts[i])
    }

    /// Posts carrying `tag`, ignoring case
    pub fn by_tag(&self, tag: &str) -> Vec<&Post> {
        self.lookup(&self.by_tag, tag)
    }

    /// Posts in `category`, ignoring case
    pub fn by_category(&self, category: &str) -> Vec<&Post> {
        self.lookup(&self.by_category, category)
    }

    fn lookup(&self, map: &HashMap<String, Vec<usize>>, key: &str) -> Vec<&Post> {
        map.get(&key.to_lowercase())
            .map(|positions| positions.iter().map(|&i| &self.posts[i]).collect())
            .unwrap_or_default()
    }

    /// Distinct tags as written, sorted
    pub fn tags(&self) -> Vec<String> {
        let tags: BTreeSet<&str> = self
            .posts
            .iter()
            .flat_map(|p| p.tags.iter().map(String::as_str))
            .collect();
        tags.into_iter().map(str::to_string).collect()
    }

    /// Distinct non-empty categories as written, sorted
    pub fn categories(&self) -> Vec<String> {
        let categories: BTreeSet<&str> = self
            .posts
            .iter()
            .filter_map(|p| p.category.as_deref())
            .filter(|c| !c.is_empty())
            .collect();
        categories.into_iter().map(str::to_string).collect()
    }

    /// Case-insensitive substring search over title, description, rendered
    /// HTML and tags. No ranking: results keep list order. An empty query
    /// matches everything; callers decide whether to search at all.
    pub fn search(&self, query: &str) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.matches(query)).collect()
    }

    /// Posts related to `post`, up to `limit`.
    ///
    /// Candidates are all other published posts in list order. Those sharing
    /// a tag or the same non-empty category come first; if there are fewer
    /// than `limit`, the remaining candidates fill up in list order.
    pub fn related(&self, post: &Post, limit: usize) -> Vec<&Post> {
        let (mut related, rest): (Vec<&Post>, Vec<&Post>) = self
            .posts
            .iter()
            .filter(|candidate| candidate.slug != post.slug)
            .partition(|candidate| candidate.is_related_to(post));

        if related.len() < limit {
            let missing = limit - related.len();
            related.extend(rest.into_iter().take(missing));
        }
        related.truncate(limit);
        related
    }

    /// The newest `limit` posts
    pub fn featured(&self, limit: usize) -> Vec<&Post> {
        self.posts.iter().take(limit).collect()
    }

    /// Page `page` (1-based) of `per_page` posts
    pub fn paginate(&self, page: usize, per_page: usize) -> Paginated {
        let per_page = per_page.max(1);
        let page = page.max(1);
        let total_posts = self.posts.len();
        let total_pages = total_posts.div_ceil(per_page);
        let start = (page - 1).saturating_mul(per_page);

        Paginated {
            posts: self.posts.iter().skip(start).take(per_page).cloned().collect(),
            current_page: page,
            total_pages,
            total_posts,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}

fn push_unique(positions: &mut Vec<usize>, i: usize) {
    if positions.last() != Some(&i) {
        positions.push(i);
    }
}
