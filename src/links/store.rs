use anyhow::Result;
use libsql::Connection;
use serde::{Deserialize, Serialize};

use super::normalize_tags;
use crate::db::{Database, placeholders};
use crate::handler::HandlerParams;
use crate::metadata::{fetch_link_metadata, normalize_url};
use crate::model::{Link, LinkPage, ShorteningStatus, TagCount, TagSummary};

const TAG_SEPARATOR: char = '\u{1f}';

const LINK_COLUMNS: &str = r#"
    links.id,
    links.user_id,
    links.url,
    links.title,
    links.favicon,
    links.short_url,
    links.rebrandly_id,
    links.shortening_status,
    links.created_at,
    links.updated_at,
    (
        SELECT GROUP_CONCAT(name, char(31)) FROM (
            SELECT tags.name FROM link_tags
            JOIN tags ON tags.id = link_tags.tag_id
            WHERE link_tags.link_id = links.id
            ORDER BY link_tags.id
        )
    ) AS tag_names
"#;

const HAS_TAG: &str = r#"EXISTS (
    SELECT 1 FROM link_tags lt JOIN tags t ON t.id = lt.tag_id
    WHERE lt.link_id = links.id AND t.name = ?
)"#;

const MATCHES_QUERY: &str = r#"(
    links.title LIKE ? ESCAPE '\'
    OR links.url LIKE ? ESCAPE '\'
    OR EXISTS (
        SELECT 1 FROM link_tags lt JOIN tags t ON t.id = lt.tag_id
        WHERE lt.link_id = links.id AND t.name LIKE ? ESCAPE '\'
    )
)"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLink {
    pub url: String,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub favicon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLink {
    pub url: Option<String>,
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub favicon: Option<String>,
}

/// A validated link ready to insert.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub url: String,
    pub title: String,
    pub tags: Vec<String>,
    pub favicon: Option<String>,
}

impl NewLink {
    /// Normalises the URL and fills title/favicon from the URL when missing.
    /// Returns `None` when the URL is blank.
    pub fn from_input(input: CreateLink) -> Option<Self> {
        let url = normalize_url(&input.url)?;
        let metadata = fetch_link_metadata(&url);

        let title = input
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or(metadata.title);
        let favicon = input.favicon.filter(|f| !f.trim().is_empty()).or(metadata.favicon);

        Some(NewLink {
            url,
            title,
            tags: normalize_tags(input.tags.unwrap_or_default()),
            favicon,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLink {
    pub original_url: String,
    pub short_url: String,
}

pub struct LinkStore<'a> {
    db: &'a Database,
}

impl<'a> LinkStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn conn(&self) -> &'a Connection {
        self.db.connection()
    }

    pub async fn create(&self, user_id: &str, input: NewLink) -> Result<Link> {
        let link_id = self
            .db
            .transaction(|conn| async move {
                let query = r#"
                    INSERT INTO links (user_id, url, title, favicon)
                    VALUES (?, ?, ?, ?)
                    RETURNING id
                "#;

                let mut rows = conn
                    .query(query, libsql::params![user_id, input.url, input.title, input.favicon])
                    .await?;

                let link_id: i32 = if let Some(row) = rows.next().await? {
                    row.get(0)?
                } else {
                    anyhow::bail!("Failed to create link")
                };

                attach_tags(conn, user_id, link_id, &input.tags).await?;
                Ok::<_, anyhow::Error>(link_id)
            })
            .await?;

        self.get(user_id, link_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("link {} vanished after insert", link_id))
    }

    pub async fn get(&self, user_id: &str, id: i32) -> Result<Option<Link>> {
        fetch_link(self.conn(), user_id, id).await
    }

    pub async fn list(&self, user_id: &str, params: &HandlerParams) -> Result<LinkPage> {
        let mut clauses = vec!["links.user_id = ?"];
        let mut values: Vec<libsql::Value> = vec![user_id.into()];

        if let Some(q) = &params.query {
            let pattern = format!("%{}%", escape_like(q));
            clauses.push(MATCHES_QUERY);
            for _ in 0..3 {
                values.push(pattern.clone().into());
            }
        }

        for tag in &params.tags {
            clauses.push(HAS_TAG);
            values.push(tag.clone().into());
        }

        let where_clause = clauses.join(" AND ");

        let count_query = format!("SELECT COUNT(*) FROM links WHERE {}", where_clause);
        let mut rows = self.conn().query(&count_query, values.clone()).await?;
        let total: i32 = match rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };

        let page_query = format!(
            "SELECT {} FROM links WHERE {} ORDER BY links.created_at DESC, links.id DESC LIMIT ? OFFSET ?",
            LINK_COLUMNS, where_clause
        );
        values.push((params.limit as i64).into());
        values.push((params.offset as i64).into());

        let mut rows = self.conn().query(&page_query, values).await?;
        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            links.push(row_to_link(&row)?);
        }

        Ok(LinkPage {
            links,
            total,
            page: params.page,
            limit: params.limit,
        })
    }

    pub async fn update(&self, user_id: &str, id: i32, input: UpdateLink) -> Result<Option<Link>> {
        let existing = match self.get(user_id, id).await? {
            Some(link) => link,
            None => return Ok(None),
        };

        let mut updates = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(url) = input.url.as_deref().and_then(normalize_url) {
            if url != existing.url {
                updates.push("url = ?");
                params.push(url.into());
                // A new destination invalidates the old short link.
                updates.push("short_url = NULL");
                updates.push("rebrandly_id = NULL");
                updates.push("shortening_status = NULL");
            }
        }
        if let Some(title) = input.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            updates.push("title = ?");
            params.push(title.into());
        }
        if let Some(favicon) = input.favicon {
            updates.push("favicon = ?");
            params.push(if favicon.trim().is_empty() {
                libsql::Value::Null
            } else {
                favicon.into()
            });
        }
        let tags = input.tags.map(normalize_tags);

        if updates.is_empty() && tags.is_none() {
            return Ok(Some(existing));
        }

        updates.push("updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')");
        params.push(id.into());
        params.push(user_id.into());

        let query = format!("UPDATE links SET {} WHERE id = ? AND user_id = ?", updates.join(", "));

        self.db
            .transaction(|conn| async move {
                conn.execute(&query, params).await?;
                if let Some(tags) = tags {
                    conn.execute("DELETE FROM link_tags WHERE link_id = ?", libsql::params![id])
                        .await?;
                    attach_tags(conn, user_id, id, &tags).await?;
                }
                Ok::<_, anyhow::Error>(())
            })
            .await?;

        self.get(user_id, id).await
    }

    pub async fn delete(&self, user_id: &str, id: i32) -> Result<bool> {
        self.db
            .transaction(|conn| async move {
                let deleted = conn
                    .execute(
                        "DELETE FROM links WHERE id = ? AND user_id = ?",
                        libsql::params![id, user_id],
                    )
                    .await?;
                if deleted > 0 {
                    conn.execute("DELETE FROM link_tags WHERE link_id = ?", libsql::params![id])
                        .await?;
                }
                Ok::<_, anyhow::Error>(deleted > 0)
            })
            .await
    }

    pub async fn tag_summary(&self, user_id: &str) -> Result<TagSummary> {
        let query = r#"
            SELECT tags.name, COUNT(link_tags.id) AS count
            FROM tags
            JOIN link_tags ON link_tags.tag_id = tags.id
            JOIN links ON links.id = link_tags.link_id
            WHERE tags.user_id = ? AND links.user_id = ?
            GROUP BY tags.id, tags.name
            ORDER BY count DESC, tags.name ASC
        "#;

        let mut rows = self.conn().query(query, libsql::params![user_id, user_id]).await?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next().await? {
            tags.push(TagCount {
                name: row.get(0)?,
                count: row.get(1)?,
            });
        }

        let mut rows = self
            .conn()
            .query("SELECT COUNT(*) FROM links WHERE user_id = ?", libsql::params![user_id])
            .await?;
        let total_links: i32 = match rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };

        Ok(TagSummary { tags, total_links })
    }

    /// Adds `tags` to every listed link the user owns, keeping existing tags.
    /// Returns how many links were touched.
    pub async fn bulk_add_tags(&self, user_id: &str, link_ids: &[i32], tags: &[String]) -> Result<i32> {
        let owned = self.owned_ids(user_id, link_ids).await?;
        if owned.is_empty() || tags.is_empty() {
            return Ok(0);
        }

        self.db
            .transaction(|conn| async move {
                for link_id in &owned {
                    attach_tags(conn, user_id, *link_id, tags).await?;
                    conn.execute(
                        "UPDATE links SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?",
                        libsql::params![*link_id],
                    )
                    .await?;
                }
                Ok::<_, anyhow::Error>(owned.len() as i32)
            })
            .await
    }

    async fn owned_ids(&self, user_id: &str, link_ids: &[i32]) -> Result<Vec<i32>> {
        if link_ids.is_empty() {
            return Ok(vec![]);
        }

        let query = format!(
            "SELECT id FROM links WHERE user_id = ? AND id IN ({})",
            placeholders(link_ids.len())
        );
        let mut values: Vec<libsql::Value> = vec![user_id.into()];
        values.extend(link_ids.iter().map(|id| libsql::Value::from(*id)));

        let mut rows = self.conn().query(&query, values).await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }

    /// Links among `link_ids` that the user owns and that have no short URL
    /// yet, in the order of `link_ids`.
    pub async fn find_unshortened(&self, user_id: &str, link_ids: &[i32]) -> Result<Vec<Link>> {
        if link_ids.is_empty() {
            return Ok(vec![]);
        }

        let query = format!(
            "SELECT {} FROM links WHERE links.user_id = ? AND links.short_url IS NULL AND links.id IN ({})",
            LINK_COLUMNS,
            placeholders(link_ids.len())
        );
        let mut values: Vec<libsql::Value> = vec![user_id.into()];
        values.extend(link_ids.iter().map(|id| libsql::Value::from(*id)));

        let mut rows = self.conn().query(&query, values).await?;
        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            links.push(row_to_link(&row)?);
        }

        links.sort_by_key(|link| link_ids.iter().position(|id| *id == link.id));
        Ok(links)
    }

    pub async fn set_status(&self, user_id: &str, link_ids: &[i32], status: ShorteningStatus) -> Result<()> {
        if link_ids.is_empty() {
            return Ok(());
        }

        let query = format!(
            r#"UPDATE links
               SET shortening_status = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
               WHERE user_id = ? AND id IN ({})"#,
            placeholders(link_ids.len())
        );
        let mut values: Vec<libsql::Value> = vec![status.as_str().into(), user_id.into()];
        values.extend(link_ids.iter().map(|id| libsql::Value::from(*id)));

        self.db.execute(&query, values).await?;
        Ok(())
    }

    pub async fn record_short_url(
        &self,
        user_id: &str,
        link_id: i32,
        short_url: &str,
        rebrandly_id: &str,
    ) -> Result<()> {
        let query = r#"
            UPDATE links
            SET short_url = ?, rebrandly_id = ?, shortening_status = ?,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            WHERE id = ? AND user_id = ?
        "#;

        self.db
            .execute(
                query,
                libsql::params![
                    short_url,
                    rebrandly_id,
                    ShorteningStatus::Shortened.as_str(),
                    link_id,
                    user_id
                ],
            )
            .await?;
        Ok(())
    }

    /// Finds the link behind a short code across all users. A short URL
    /// whose last path segment is exactly the code wins over a substring hit.
    pub async fn resolve(&self, short_code: &str) -> Result<Option<ResolvedLink>> {
        if short_code.is_empty() {
            return Ok(None);
        }

        let query = r#"
            SELECT url, short_url FROM links
            WHERE short_url LIKE ? ESCAPE '\'
            ORDER BY id
        "#;

        let pattern = format!("%{}%", escape_like(short_code));
        let mut rows = self.conn().query(query, libsql::params![pattern]).await?;

        let mut fallback = None;
        while let Some(row) = rows.next().await? {
            let resolved = ResolvedLink {
                original_url: row.get(0)?,
                short_url: row.get(1)?,
            };

            let last_segment = resolved.short_url.trim_end_matches('/').rsplit('/').next();
            if last_segment == Some(short_code) {
                return Ok(Some(resolved));
            }
            if fallback.is_none() && resolved.short_url.contains(short_code) {
                fallback = Some(resolved);
            }
        }

        Ok(fallback)
    }
}

async fn fetch_link(conn: &Connection, user_id: &str, id: i32) -> Result<Option<Link>> {
    let query = format!(
        "SELECT {} FROM links WHERE links.id = ? AND links.user_id = ?",
        LINK_COLUMNS
    );

    let mut rows = conn.query(&query, libsql::params![id, user_id]).await?;

    if let Some(row) = rows.next().await? {
        Ok(Some(row_to_link(&row)?))
    } else {
        Ok(None)
    }
}

async fn get_or_create_tag(conn: &Connection, user_id: &str, name: &str) -> Result<i32> {
    conn.execute(
        "INSERT OR IGNORE INTO tags (user_id, name) VALUES (?, ?)",
        libsql::params![user_id, name],
    )
    .await?;

    let mut rows = conn
        .query(
            "SELECT id FROM tags WHERE user_id = ? AND name = ? LIMIT 1",
            libsql::params![user_id, name],
        )
        .await?;

    if let Some(row) = rows.next().await? {
        Ok(row.get(0)?)
    } else {
        anyhow::bail!("Failed to get or create tag: {}", name)
    }
}

async fn attach_tags(conn: &Connection, user_id: &str, link_id: i32, tags: &[String]) -> Result<()> {
    for tag in tags {
        let tag_id = get_or_create_tag(conn, user_id, tag).await?;
        conn.execute(
            "INSERT OR IGNORE INTO link_tags (link_id, tag_id) VALUES (?, ?)",
            libsql::params![link_id, tag_id],
        )
        .await?;
    }
    Ok(())
}

fn row_to_link(row: &libsql::Row) -> Result<Link> {
    let status: Option<String> = row.get(7)?;
    let tag_names: Option<String> = row.get(10)?;

    Ok(Link {
        id: row.get(0)?,
        user_id: row.get(1)?,
        url: row.get(2)?,
        title: row.get(3)?,
        favicon: row.get(4)?,
        short_url: row.get(5)?,
        rebrandly_id: row.get(6)?,
        shortening_status: status.as_deref().and_then(|s| s.parse().ok()),
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
        tags: tag_names
            .map(|names| {
                names
                    .split(TAG_SEPARATOR)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    })
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_db;

    fn new_link(url: &str, tags: &[&str]) -> NewLink {
        NewLink::from_input(CreateLink {
            url: url.to_string(),
            title: None,
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
            favicon: None,
        })
        .unwrap()
    }

    fn params(query: Option<&str>, tags: &[&str]) -> HandlerParams {
        HandlerParams {
            query: query.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            page: 1,
            limit: 50,
            offset: 0,
        }
    }

    #[test]
    fn test_new_link_fills_metadata() {
        let link = NewLink::from_input(CreateLink {
            url: "  example.com/my-article ".to_string(),
            title: Some("   ".to_string()),
            tags: Some(vec!["a".into(), " a ".into(), "b".into()]),
            favicon: None,
        })
        .unwrap();

        assert_eq!(link.url, "https://example.com/my-article");
        assert_eq!(link.title, "My Article");
        assert_eq!(link.tags, vec!["a", "b"]);
        assert!(link.favicon.unwrap().contains("domain=example.com"));

        assert!(
            NewLink::from_input(CreateLink {
                url: " ".to_string(),
                title: None,
                tags: None,
                favicon: None,
            })
            .is_none()
        );
    }

    #[tokio::test]
    async fn test_create_and_get_link() {
        let (db, _dir) = temp_db().await;
        let store = LinkStore::new(&db);

        let link = store.create("alice", new_link("https://rust-lang.org/learn", &["rust", "docs"])).await.unwrap();

        assert_eq!(link.user_id, "alice");
        assert_eq!(link.title, "Learn");
        assert_eq!(link.tags, vec!["rust", "docs"]);
        assert_eq!(link.shortening_status, None);

        let fetched = store.get("alice", link.id).await.unwrap().unwrap();
        assert_eq!(fetched.url, "https://rust-lang.org/learn");

        assert!(store.get("bob", link.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_search_and_tag_filter() {
        let (db, _dir) = temp_db().await;
        let store = LinkStore::new(&db);

        store.create("alice", new_link("https://a.dev/tokio-guide", &["rust", "async"])).await.unwrap();
        store.create("alice", new_link("https://b.dev/react-hooks", &["js", "web"])).await.unwrap();
        store.create("alice", new_link("https://c.dev/axum", &["rust", "web"])).await.unwrap();
        store.create("bob", new_link("https://d.dev/rust-book", &["rust"])).await.unwrap();

        let page = store.list("alice", &params(None, &[])).await.unwrap();
        assert_eq!(page.total, 3);
        // newest first
        assert_eq!(page.links[0].url, "https://c.dev/axum");

        let page = store.list("alice", &params(Some("TOKIO"), &[])).await.unwrap();
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].title, "Tokio Guide");

        // tag names are searched too
        let page = store.list("alice", &params(Some("asy"), &[])).await.unwrap();
        assert_eq!(page.links.len(), 1);

        let page = store.list("alice", &params(None, &["rust", "web"])).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.links[0].url, "https://c.dev/axum");

        let page = store.list("alice", &params(None, &["web"])).await.unwrap();
        assert_eq!(page.total, 2);

        // LIKE wildcards in the query are literal
        let page = store.list("alice", &params(Some("%"), &[])).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let (db, _dir) = temp_db().await;
        let store = LinkStore::new(&db);

        for i in 0..5 {
            store.create("alice", new_link(&format!("https://x.dev/{}", i), &[])).await.unwrap();
        }

        let mut p = params(None, &[]);
        p.page = 2;
        p.limit = 2;
        p.offset = 2;
        let page = store.list("alice", &p).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.links.len(), 2);
        assert_eq!(page.links[0].url, "https://x.dev/2");
    }

    #[tokio::test]
    async fn test_update_replaces_tags_and_resets_short_url() {
        let (db, _dir) = temp_db().await;
        let store = LinkStore::new(&db);

        let link = store.create("alice", new_link("https://a.dev/one", &["old"])).await.unwrap();
        store.record_short_url("alice", link.id, "rebrand.ly/abc", "rb1").await.unwrap();

        let updated = store
            .update(
                "alice",
                link.id,
                UpdateLink {
                    title: Some("Renamed".to_string()),
                    tags: Some(vec!["new".to_string(), "fresh".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.tags, vec!["new", "fresh"]);
        assert_eq!(updated.short_url.as_deref(), Some("rebrand.ly/abc"));

        let moved = store
            .update(
                "alice",
                link.id,
                UpdateLink {
                    url: Some("a.dev/two".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.url, "https://a.dev/two");
        assert_eq!(moved.short_url, None);
        assert_eq!(moved.rebrandly_id, None);
        assert_eq!(moved.shortening_status, None);

        assert!(store.update("bob", link.id, UpdateLink::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_link() {
        let (db, _dir) = temp_db().await;
        let store = LinkStore::new(&db);

        let link = store.create("alice", new_link("https://a.dev", &["x"])).await.unwrap();

        assert!(!store.delete("bob", link.id).await.unwrap());
        assert!(store.delete("alice", link.id).await.unwrap());
        assert!(store.get("alice", link.id).await.unwrap().is_none());
        assert!(store.tag_summary("alice").await.unwrap().tags.is_empty());
    }

    #[tokio::test]
    async fn test_tag_summary_and_bulk_tags() {
        let (db, _dir) = temp_db().await;
        let store = LinkStore::new(&db);

        let a = store.create("alice", new_link("https://a.dev", &["rust"])).await.unwrap();
        let b = store.create("alice", new_link("https://b.dev", &[])).await.unwrap();
        let other = store.create("bob", new_link("https://c.dev", &[])).await.unwrap();

        let touched = store
            .bulk_add_tags("alice", &[a.id, b.id, other.id], &["rust".to_string(), "later".to_string()])
            .await
            .unwrap();
        assert_eq!(touched, 2);

        let a = store.get("alice", a.id).await.unwrap().unwrap();
        assert_eq!(a.tags, vec!["rust", "later"]);
        assert!(store.get("bob", other.id).await.unwrap().unwrap().tags.is_empty());

        let summary = store.tag_summary("alice").await.unwrap();
        assert_eq!(summary.total_links, 2);
        assert_eq!(
            summary.tags,
            vec![
                TagCount { name: "later".to_string(), count: 2 },
                TagCount { name: "rust".to_string(), count: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn test_find_unshortened_keeps_request_order() {
        let (db, _dir) = temp_db().await;
        let store = LinkStore::new(&db);

        let a = store.create("alice", new_link("https://a.dev", &[])).await.unwrap();
        let b = store.create("alice", new_link("https://b.dev", &[])).await.unwrap();
        let c = store.create("alice", new_link("https://c.dev", &[])).await.unwrap();
        store.record_short_url("alice", b.id, "rebrand.ly/b", "rb").await.unwrap();

        let found = store.find_unshortened("alice", &[c.id, b.id, a.id, 999]).await.unwrap();
        let ids: Vec<i32> = found.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![c.id, a.id]);

        store.set_status("alice", &ids, ShorteningStatus::Pending).await.unwrap();
        let c = store.get("alice", c.id).await.unwrap().unwrap();
        assert_eq!(c.shortening_status, Some(ShorteningStatus::Pending));
    }

    #[tokio::test]
    async fn test_resolve_prefers_exact_segment() {
        let (db, _dir) = temp_db().await;
        let store = LinkStore::new(&db);

        let a = store.create("alice", new_link("https://a.dev", &[])).await.unwrap();
        let b = store.create("bob", new_link("https://b.dev", &[])).await.unwrap();
        store.record_short_url("alice", a.id, "rebrand.ly/abcd", "1").await.unwrap();
        store.record_short_url("bob", b.id, "rebrand.ly/abc", "2").await.unwrap();

        let resolved = store.resolve("abc").await.unwrap().unwrap();
        assert_eq!(resolved.original_url, "https://b.dev");

        let resolved = store.resolve("bcd").await.unwrap().unwrap();
        assert_eq!(resolved.original_url, "https://a.dev");

        assert!(store.resolve("zzz").await.unwrap().is_none());
        assert!(store.resolve("").await.unwrap().is_none());
    }
}
