//! Aggregates over a blog listing.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::Blog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: i64,
}

/// Saturates at `i64::MAX` rather than overflowing
pub fn total_likes(blogs: &[Blog]) -> i64 {
    blogs.iter().fold(0, |sum, b| sum.saturating_add(b.likes))
}

/// Most-liked blog; the earliest one wins a tie
pub fn favorite_blog(blogs: &[Blog]) -> Option<&Blog> {
    blogs.iter().fold(None, |best: Option<&Blog>, blog| match best {
        Some(b) if b.likes >= blog.likes => Some(b),
        _ => Some(blog),
    })
}

pub fn most_blogs(blogs: &[Blog]) -> Option<AuthorBlogs> {
    tally_by_author(blogs, |_| 1).map(|(author, blogs)| AuthorBlogs {
        author,
        blogs: blogs as usize,
    })
}

pub fn most_likes(blogs: &[Blog]) -> Option<AuthorLikes> {
    tally_by_author(blogs, |b| b.likes).map(|(author, likes)| AuthorLikes { author, likes })
}

// Blogs without an author are skipped; first-seen author wins a tie.
// Totals saturate at `i64::MAX`.
fn tally_by_author(blogs: &[Blog], weight: impl Fn(&Blog) -> i64) -> Option<(String, i64)> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, i64> = HashMap::new();

    for blog in blogs {
        let Some(author) = blog.author.as_deref().filter(|a| !a.is_empty()) else {
            continue;
        };
        let total = totals.entry(author).or_insert_with(|| {
            order.push(author);
            0
        });
        *total = total.saturating_add(weight(blog));
    }

    let mut best: Option<(&str, i64)> = None;
    for author in order {
        let total = totals[author];
        if best.map_or(true, |(_, max)| total > max) {
            best = Some((author, total));
        }
    }
    best.map(|(author, total)| (author.to_string(), total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn blog(title: &str, author: Option<&str>, likes: i64) -> Blog {
        Blog {
            id: Uuid::new_v4(),
            title: title.to_string(),
            author: author.map(str::to_string),
            url: format!("https://example.com/{}", title),
            likes,
            user: None,
        }
    }

    fn listing() -> Vec<Blog> {
        vec![
            blog("React patterns", Some("Michael Chan"), 7),
            blog("Go To Statement Considered Harmful", Some("Edsger W. Dijkstra"), 5),
            blog("Canonical string reduction", Some("Edsger W. Dijkstra"), 12),
            blog("First class tests", Some("Robert C. Martin"), 10),
            blog("TDD harms architecture", Some("Robert C. Martin"), 0),
            blog("Type wars", Some("Robert C. Martin"), 2),
        ]
    }

    #[test]
    fn total_likes_of_empty_list_is_zero() {
        assert_eq!(total_likes(&[]), 0);
    }

    #[test]
    fn total_likes_of_single_blog_is_its_likes() {
        assert_eq!(total_likes(&[blog("Go To", Some("Edsger W. Dijkstra"), 5)]), 5);
    }

    #[test]
    fn total_likes_of_bigger_list() {
        assert_eq!(total_likes(&listing()), 36);
    }

    #[test]
    fn favorite_of_empty_list_is_none() {
        assert!(favorite_blog(&[]).is_none());
    }

    #[test]
    fn favorite_is_most_liked() {
        let blogs = listing();
        assert_eq!(favorite_blog(&blogs).unwrap().title, "Canonical string reduction");
    }

    #[test]
    fn favorite_tie_keeps_first() {
        let blogs = vec![
            blog("Blog A", Some("Author A"), 10),
            blog("Blog B", Some("Author B"), 15),
            blog("Blog C", Some("Author C"), 15),
        ];
        assert_eq!(favorite_blog(&blogs).unwrap().title, "Blog B");
    }

    #[test]
    fn most_blogs_counts_per_author() {
        assert_eq!(
            most_blogs(&listing()),
            Some(AuthorBlogs {
                author: "Robert C. Martin".to_string(),
                blogs: 3
            })
        );
    }

    #[test]
    fn most_blogs_tie_keeps_first_seen_author() {
        let blogs = vec![
            blog("T1", Some("Author A"), 1),
            blog("T2", Some("Author B"), 2),
            blog("T3", Some("Author A"), 3),
            blog("T4", Some("Author B"), 4),
        ];
        assert_eq!(most_blogs(&blogs).unwrap().author, "Author A");
    }

    #[test]
    fn blogs_without_author_are_ignored() {
        let blogs = vec![
            blog("No Author Blog", None, 5),
            blog("Empty Author Blog", Some(""), 3),
        ];
        assert!(most_blogs(&blogs).is_none());
        assert!(most_likes(&blogs).is_none());
    }

    #[test]
    fn huge_like_counts_saturate() {
        let blogs = vec![
            blog("Big A", Some("Author A"), i64::MAX),
            blog("Big B", Some("Author A"), i64::MAX),
        ];
        assert_eq!(total_likes(&blogs), i64::MAX);
        assert_eq!(most_likes(&blogs).unwrap().likes, i64::MAX);
        assert_eq!(most_blogs(&blogs).unwrap().blogs, 2);
    }

    #[test]
    fn most_likes_sums_per_author() {
        assert_eq!(
            most_likes(&listing()),
            Some(AuthorLikes {
                author: "Edsger W. Dijkstra".to_string(),
                likes: 17
            })
        );
    }
}
