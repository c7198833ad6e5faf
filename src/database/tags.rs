// Tag statistics

use super::*;
use anyhow::Result;

impl SnippetDatabase {
    /// Every tag in use with its snippet count, most used first
    pub fn get_all_tags(&self) -> Result<Vec<TagCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT json_each.value AS tag, COUNT(*) AS uses
             FROM snippets, json_each(snippets.tags)
             GROUP BY json_each.value
             ORDER BY uses DESC, tag ASC",
        )?;

        let tags = stmt
            .query_map([], |row| {
                Ok(TagCount {
                    tag: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tags)
    }
}
