//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    ///
    /// `post_ids` mirrors the posts each user owns and is maintained by the
    /// post service, not by a trigger.
    users (id) {
        id -> Uuid,
        /// Unique login address.
        email -> Varchar,
        name -> Varchar,
        /// bcrypt hash; never leaves the persistence layer unhashed.
        password_hash -> Varchar,
        status -> Text,
        post_ids -> Array<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Posts on the board.
    posts (id) {
        id -> Uuid,
        title -> Text,
        content -> Text,
        /// Opaque image store path; empty when the post has no image.
        image_url -> Text,
        creator_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (creator_id));
diesel::allow_tables_to_appear_in_same_query!(posts, users);
