//! Sitemaps and robots.txt.
//!
//! Built on every request from the published posts in the store, so new
//! posts show up without a redeploy.

use std::io::Cursor;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::errors::AppError;
use crate::models::BlogPost;
use crate::AppState;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const NEWS_NS: &str = "http://www.google.com/schemas/sitemap-news/0.9";
const PUBLICATION_NAME: &str = "ClipSync Pro Blog";
const CACHE_CONTROL: &str = "public, max-age=86400";

struct SitePage {
    path: &'static str,
    priority: &'static str,
    changefreq: &'static str,
}

const SITE_PAGES: &[SitePage] = &[
    SitePage { path: "/", priority: "1.0", changefreq: "weekly" },
    SitePage { path: "/about", priority: "0.8", changefreq: "monthly" },
    SitePage { path: "/pricing", priority: "0.9", changefreq: "weekly" },
    SitePage { path: "/downloads", priority: "0.9", changefreq: "weekly" },
    SitePage { path: "/contact", priority: "0.7", changefreq: "monthly" },
    SitePage { path: "/blog", priority: "0.8", changefreq: "daily" },
];

const POST_PRIORITY: &str = "0.7";
const POST_CHANGEFREQ: &str = "weekly";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn w3c_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Most recent change across the given posts, or now when there are none.
fn last_modified(posts: &[BlogPost]) -> DateTime<Utc> {
    posts
        .iter()
        .map(|p| p.updated_at)
        .max()
        .unwrap_or_else(Utc::now)
}

fn post_url(base_url: &str, post: &BlogPost) -> String {
    format!("{}/blog/{}", base_url, post.slug)
}

fn push_text(writer: &mut XmlWriter, tag: &str, text: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn start_document(writer: &mut XmlWriter, root: &str, with_news: bool) -> quick_xml::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    let mut elem = BytesStart::new(root);
    elem.push_attribute(("xmlns", SITEMAP_NS));
    if with_news {
        elem.push_attribute(("xmlns:news", NEWS_NS));
    }
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

fn push_url(
    writer: &mut XmlWriter,
    loc: &str,
    lastmod: &str,
    priority: &str,
    changefreq: &str,
) -> quick_xml::Result<()> {
    push_text(writer, "loc", loc)?;
    push_text(writer, "lastmod", lastmod)?;
    push_text(writer, "priority", priority)?;
    push_text(writer, "changefreq", changefreq)?;
    Ok(())
}

/// Site pages followed by every published post.
pub fn render_site_sitemap(base_url: &str, posts: &[BlogPost]) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    start_document(&mut writer, "urlset", false)?;

    let site_lastmod = w3c_date(&last_modified(posts));
    for page in SITE_PAGES {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        let loc = format!("{}{}", base_url, page.path);
        push_url(&mut writer, &loc, &site_lastmod, page.priority, page.changefreq)?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    for post in posts {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        push_url(
            &mut writer,
            &post_url(base_url, post),
            &w3c_date(&post.updated_at),
            POST_PRIORITY,
            POST_CHANGEFREQ,
        )?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(writer.into_inner().into_inner())
}

/// Published posts with Google News publication metadata.
pub fn render_blog_sitemap(base_url: &str, posts: &[BlogPost]) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    start_document(&mut writer, "urlset", true)?;

    for post in posts {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        push_url(
            &mut writer,
            &post_url(base_url, post),
            &w3c_date(&post.updated_at),
            POST_PRIORITY,
            POST_CHANGEFREQ,
        )?;

        // <news:news>
        writer.write_event(Event::Start(BytesStart::new("news:news")))?;
        writer.write_event(Event::Start(BytesStart::new("news:publication")))?;
        push_text(&mut writer, "news:name", PUBLICATION_NAME)?;
        push_text(&mut writer, "news:language", "en")?;
        writer.write_event(Event::End(BytesEnd::new("news:publication")))?;
        push_text(
            &mut writer,
            "news:publication_date",
            &w3c_date(&post.sort_key()),
        )?;
        push_text(&mut writer, "news:title", &post.title)?;
        writer.write_event(Event::End(BytesEnd::new("news:news")))?;

        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(writer.into_inner().into_inner())
}

/// Index pointing at the two sitemaps.
pub fn render_sitemap_index(base_url: &str, lastmod: &DateTime<Utc>) -> quick_xml::Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    start_document(&mut writer, "sitemapindex", false)?;

    let lastmod = w3c_date(lastmod);
    for name in ["sitemap.xml", "blog-sitemap.xml"] {
        writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
        push_text(&mut writer, "loc", &format!("{}/{}", base_url, name))?;
        push_text(&mut writer, "lastmod", &lastmod)?;
        writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;
    Ok(writer.into_inner().into_inner())
}

pub fn render_robots(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\nDisallow: /admin\n\nSitemap: {}/sitemap-index.xml\n",
        base_url
    )
}

/// Public origin: configured URL first, then the request's Host header.
fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.config.public_url {
        return url.clone();
    }

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .filter(|v| *v == "https" || *v == "http")
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| state.config.bind_addr.to_string());

    format!("{}://{}", scheme, host)
}

fn xml_response(body: quick_xml::Result<Vec<u8>>) -> Result<impl IntoResponse, AppError> {
    let body = body.map_err(|e| AppError::Internal(format!("Failed to render sitemap: {}", e)))?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        body,
    ))
}

/// GET /sitemap.xml
pub async fn sitemap(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let base = base_url(&state, &headers);
    let posts = state.store.get_all_posts(Some(true)).await;
    xml_response(render_site_sitemap(&base, &posts))
}

/// GET /blog-sitemap.xml
pub async fn blog_sitemap(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let base = base_url(&state, &headers);
    let posts = state.store.get_all_posts(Some(true)).await;
    xml_response(render_blog_sitemap(&base, &posts))
}

/// GET /sitemap-index.xml
pub async fn sitemap_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let base = base_url(&state, &headers);
    let posts = state.store.get_all_posts(Some(true)).await;
    xml_response(render_sitemap_index(&base, &last_modified(&posts)))
}

/// GET /robots.txt
pub async fn robots(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let base = base_url(&state, &headers);
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        render_robots(&base),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(slug: &str, title: &str) -> BlogPost {
        let date = Utc.with_ymd_and_hms(2024, 8, 12, 9, 30, 0).unwrap();
        BlogPost {
            id: slug.to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: String::new(),
            content: String::new(),
            meta_description: String::new(),
            keywords: String::new(),
            og_image: None,
            author: "Tester".to_string(),
            category: "Testing".to_string(),
            tags: vec![],
            published: true,
            featured: false,
            view_count: 0,
            published_at: Some(date),
            created_at: date,
            updated_at: date,
        }
    }

    fn render(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_site_sitemap_lists_pages_and_posts() {
        let posts = vec![post("first-post", "First")];
        let xml = render(render_site_sitemap("https://clipsync.pro", &posts).unwrap());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>https://clipsync.pro/</loc>"));
        assert!(xml.contains("<loc>https://clipsync.pro/pricing</loc>"));
        assert!(xml.contains("<loc>https://clipsync.pro/blog/first-post</loc>"));
        assert!(xml.contains("<lastmod>2024-08-12</lastmod>"));
        assert_eq!(xml.matches("<url>").count(), SITE_PAGES.len() + 1);
    }

    #[test]
    fn test_blog_sitemap_has_news_metadata() {
        let posts = vec![post("a-post", "Tips & Tricks")];
        let xml = render(render_blog_sitemap("http://localhost:5000", &posts).unwrap());

        assert!(xml.contains(NEWS_NS));
        assert!(xml.contains("<news:name>ClipSync Pro Blog</news:name>"));
        assert!(xml.contains("<news:publication_date>2024-08-12</news:publication_date>"));
        assert!(xml.contains("Tips &amp; Tricks"));
        assert!(xml.contains("<loc>http://localhost:5000/blog/a-post</loc>"));
    }

    #[test]
    fn test_empty_blog_sitemap() {
        let xml = render(render_blog_sitemap("http://x", &[]).unwrap());
        assert!(!xml.contains("<url>"));
        assert!(xml.contains("urlset"));
    }

    #[test]
    fn test_index_and_robots() {
        let lastmod = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        let xml = render(render_sitemap_index("https://clipsync.pro", &lastmod).unwrap());
        assert!(xml.contains("<loc>https://clipsync.pro/sitemap.xml</loc>"));
        assert!(xml.contains("<loc>https://clipsync.pro/blog-sitemap.xml</loc>"));
        assert!(xml.contains("<lastmod>2025-01-02</lastmod>"));

        let robots = render_robots("https://clipsync.pro");
        assert!(robots.contains("Sitemap: https://clipsync.pro/sitemap-index.xml"));
        assert!(robots.contains("Disallow: /api/"));
    }
}
