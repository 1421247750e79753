//! Sample posts written when no data file exists yet.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{BlogPost, DEFAULT_AUTHOR};

struct SamplePost {
    title: &'static str,
    slug: &'static str,
    excerpt: &'static str,
    content: &'static str,
    meta_description: &'static str,
    keywords: &'static str,
    author: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    featured: bool,
    date: (i32, u32, u32),
}

const SAMPLES: &[SamplePost] = &[
    SamplePost {
        title: "10 Clipboard Manager Shortcuts That Will Transform Your Productivity",
        slug: "clipboard-manager-productivity-shortcuts",
        excerpt: "Discover essential keyboard shortcuts and power-user tips that will change how you work with clipboard managers, from instant search to batch operations.",
        content: "# Transform Your Workflow with Essential Clipboard Shortcuts\n\n\
A clipboard manager is more than a better copy and paste. These are the shortcuts that separate power users from casual ones.\n\n\
## Lightning-Fast Search (Ctrl/Cmd + Space)\n\n\
Type a few characters and the history filters as you type. Partial matches work: \"pass\" finds \"passport\" and \"bypass\".\n\n\
## Category Filters (Ctrl/Cmd + 1-9)\n\n\
- Ctrl+1: recent items\n- Ctrl+2: links\n- Ctrl+3: email addresses\n- Ctrl+5: code snippets\n\n\
## Bulk Operations (Shift + Select)\n\n\
Delete, export or merge several clips at once.\n\n\
*Download ClipSync Pro and start using these shortcuts today.*",
        meta_description: "Master 10 essential clipboard manager shortcuts and productivity tips. Learn power-user techniques, automation tricks and workflow optimization strategies.",
        keywords: "clipboard manager shortcuts, productivity tips, workflow automation, keyboard shortcuts, power user tips",
        author: DEFAULT_AUTHOR,
        category: "Productivity",
        tags: &["shortcuts", "productivity", "automation", "workflow", "power-user"],
        featured: true,
        date: (2024, 8, 10),
    },
    SamplePost {
        title: "Why Linux Users Are Switching to ClipSync Pro: Complete Review",
        slug: "linux-clipboard-manager-clipsync-pro-review",
        excerpt: "An in-depth look at why ClipSync Pro became the go-to clipboard manager on Linux: benchmarks, feature comparisons and user feedback.",
        content: "# ClipSync Pro on Linux: A Complete Review\n\n\
## Performance\n\n\
- Startup in 0.3 seconds\n- Search under 50ms across 10,000 clips\n- Around 45MB of memory\n\n\
## Features for Professionals\n\n\
Regex search, content-type filters, syntax highlighting for code clips and clipboard sync across tmux sessions.\n\n\
## Privacy\n\n\
Local-only storage, encryption at rest and auto-expiry for sensitive entries.\n\n\
## Tested Distributions\n\n\
Ubuntu, Debian, Fedora, Arch, openSUSE, Pop!_OS and Linux Mint.",
        meta_description: "Comprehensive review of the ClipSync Pro clipboard manager for Linux: performance benchmarks, feature analysis and comparison with Parcellite and GPaste.",
        keywords: "linux clipboard manager, clipsync pro review, linux productivity tools, parcellite alternative, gpaste alternative",
        author: DEFAULT_AUTHOR,
        category: "Reviews",
        tags: &["linux", "review", "comparison", "performance", "productivity"],
        featured: true,
        date: (2024, 8, 12),
    },
    SamplePost {
        title: "The Complete Guide to Clipboard Security: Protecting Your Sensitive Data",
        slug: "clipboard-security-guide-protect-sensitive-data",
        excerpt: "Clipboard security practices that protect passwords, financial data and other sensitive information, with practical configuration tips.",
        content: "# The Complete Guide to Clipboard Security\n\n\
Passwords, account numbers and API keys all pass through the clipboard.\n\n\
## Common Risks\n\n\
1. Malware watching clipboard contents\n2. Shared machines keeping history\n3. Cloud sync copying sensitive data\n\n\
## Essential Practices\n\n\
- Auto-clear financial data after five minutes\n- Clear password-like entries right after use\n- Purge history when the session locks\n\n\
## Encryption at Rest\n\n\
Enable AES-256 for stored clips and protect the key with a master password.",
        meta_description: "Complete guide to clipboard security best practices. Protect passwords, financial data and sensitive information from clipboard-based attacks.",
        keywords: "clipboard security, data protection, password security, clipboard encryption, security best practices",
        author: "Security Team",
        category: "Security",
        tags: &["security", "privacy", "encryption", "data-protection", "best-practices"],
        featured: false,
        date: (2024, 8, 13),
    },
];

fn midnight_utc((year, month, day): (i32, u32, u32)) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Fresh copies of the sample posts, all published, with new ids.
pub(super) fn sample_posts() -> Vec<BlogPost> {
    SAMPLES
        .iter()
        .map(|sample| {
            let date = midnight_utc(sample.date);
            BlogPost {
                id: uuid::Uuid::new_v4().to_string(),
                title: sample.title.to_string(),
                slug: sample.slug.to_string(),
                excerpt: sample.excerpt.to_string(),
                content: sample.content.to_string(),
                meta_description: sample.meta_description.to_string(),
                keywords: sample.keywords.to_string(),
                og_image: None,
                author: sample.author.to_string(),
                category: sample.category.to_string(),
                tags: sample.tags.iter().map(|t| t.to_string()).collect(),
                published: true,
                featured: sample.featured,
                view_count: 0,
                published_at: Some(date),
                created_at: date,
                updated_at: date,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::is_valid_slug;
    use std::collections::HashSet;

    #[test]
    fn test_samples_are_well_formed() {
        let posts = sample_posts();
        assert_eq!(posts.len(), 3);

        let slugs: HashSet<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs.len(), 3);
        assert!(posts.iter().all(|p| is_valid_slug(&p.slug)));
        assert!(posts.iter().all(|p| p.published && p.published_at.is_some()));
        assert_eq!(posts.iter().filter(|p| p.featured).count(), 2);
    }
}
