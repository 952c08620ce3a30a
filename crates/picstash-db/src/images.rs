use chrono::Utc;
use picstash_utils::{extract_tags, normalize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{Image, NewImage};
use crate::{Store, public_id};

const IMAGE_COLUMNS: &str =
    "id, public_id, description, url, likes, liked, tags, user_id, created_at";

impl Store {
    /// Insert an image, then patch its public id onto the same row.
    ///
    /// The two writes are not atomic: a failure between them leaves a row
    /// with no `public_id`, which `backfill_public_ids` repairs. The
    /// returned record is re-read after the patch.
    pub async fn save_image(&self, image: NewImage) -> Result<Image> {
        let pool = self.pool()?;

        let created_at = Utc::now();
        let tags = extract_tags(Some(image.description.as_str()));

        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO images (description, url, likes, liked, tags, user_id, created_at)
             VALUES ($1, $2, $3, FALSE, $4, $5, $6)
             RETURNING id",
        )
        .bind(&image.description)
        .bind(&image.url)
        .bind(image.likes)
        .bind(&tags)
        .bind(&image.user_id)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        assign_public_id(pool, id).await?;
        debug!("Saved image {}", id);

        fetch_image(pool, id)
            .await?
            .ok_or_else(|| StoreError::not_found("image", id.to_string()))
    }

    pub async fn get_image(&self, public_id: &str) -> Result<Image> {
        let pool = self.pool()?;
        let id = decode_public_id(public_id)?;

        fetch_image(pool, id)
            .await?
            .ok_or_else(|| StoreError::not_found("image", public_id))
    }

    /// All images, newest first.
    pub async fn get_images(&self) -> Result<Vec<Image>> {
        let pool = self.pool()?;

        let sql = format!("SELECT {IMAGE_COLUMNS} FROM images ORDER BY created_at DESC");
        let images = sqlx::query_as::<_, Image>(&sql).fetch_all(pool).await?;
        Ok(images)
    }

    /// Read, increment, write, re-read. Two concurrent likes on the same
    /// image can both read the same count, in which case one is lost.
    pub async fn like_image(&self, public_id: &str) -> Result<Image> {
        let pool = self.pool()?;
        let id = decode_public_id(public_id)?;

        let image = fetch_image(pool, id)
            .await?
            .ok_or_else(|| StoreError::not_found("image", public_id))?;

        let likes = image
            .likes
            .checked_add(1)
            .ok_or_else(|| StoreError::LikesOverflow { key: public_id.to_string() })?;

        let updated = sqlx::query("UPDATE images SET likes = $2, liked = TRUE WHERE id = $1")
            .bind(id)
            .bind(likes)
            .execute(pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::not_found("image", public_id));
        }

        fetch_image(pool, id)
            .await?
            .ok_or_else(|| StoreError::not_found("image", public_id))
    }

    /// Images owned by `user_id`, newest first.
    pub async fn get_image_by_user(&self, user_id: &str) -> Result<Vec<Image>> {
        let pool = self.pool()?;

        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM images WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let images = sqlx::query_as::<_, Image>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(images)
    }

    /// Images whose tags contain `tag` once normalized, newest first.
    /// Filters on array membership; there is no index on tags.
    pub async fn get_image_by_tag(&self, tag: &str) -> Result<Vec<Image>> {
        let pool = self.pool()?;
        let tag = normalize(tag);

        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM images WHERE $1 = ANY(tags) ORDER BY created_at DESC"
        );
        let images = sqlx::query_as::<_, Image>(&sql)
            .bind(&tag)
            .fetch_all(pool)
            .await?;
        Ok(images)
    }

    /// Give every image still lacking a public id the encoding of its key.
    /// Returns how many rows were patched.
    pub async fn backfill_public_ids(&self) -> Result<usize> {
        let pool = self.pool()?;

        let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM images WHERE public_id IS NULL")
            .fetch_all(pool)
            .await?;

        for id in &ids {
            assign_public_id(pool, *id).await?;
        }

        if !ids.is_empty() {
            debug!("Backfilled {} public ids", ids.len());
        }
        Ok(ids.len())
    }
}

/// Idempotent: the public id is a pure function of the key.
async fn assign_public_id(pool: &PgPool, id: Uuid) -> Result<()> {
    sqlx::query("UPDATE images SET public_id = $2 WHERE id = $1")
        .bind(id)
        .bind(public_id::encode(id))
        .execute(pool)
        .await?;
    Ok(())
}

async fn fetch_image(pool: &PgPool, id: Uuid) -> Result<Option<Image>> {
    let sql = format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = $1");
    let image = sqlx::query_as::<_, Image>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(image)
}

/// A token that decodes to nothing is indistinguishable from a missing row.
fn decode_public_id(token: &str) -> Result<Uuid> {
    public_id::decode(token).ok_or_else(|| StoreError::not_found("image", token))
}
