//! Diesel table definitions for the shared store.
//!
//! The DDL lives in the migrator; these definitions must stay in step with
//! it.

diesel::table! {
    /// Work items of every type.
    tasks (id) {
        /// Generated task identifier.
        id -> BigInt,
        /// `epic`, `task`, or `subtask`.
        #[sql_name = "type"]
        task_type -> Text,
        /// Task title.
        title -> Text,
        /// Task description.
        description -> Text,
        /// Canonical status label.
        status -> Text,
        /// Human-readable unique code.
        code -> Text,
        /// Creation timestamp.
        created_at -> Text,
    }
}

diesel::table! {
    /// Directed parent-to-child edges between tasks.
    task_links (parent_id, child_id) {
        /// Parent task identifier.
        parent_id -> BigInt,
        /// Child task identifier.
        child_id -> BigInt,
    }
}

diesel::table! {
    /// Named, categorised documents subject to versioning.
    artifacts (id) {
        /// Generated artifact identifier.
        id -> BigInt,
        /// Artifact title.
        title -> Text,
        /// `text` or `diagram`.
        kind -> Text,
        /// Canonical lowercase category.
        category -> Text,
        /// Creation timestamp.
        created_at -> Text,
    }
}

diesel::table! {
    /// Append-only content snapshots of artifacts.
    artifact_versions (id) {
        /// Generated version row identifier.
        id -> BigInt,
        /// Owning artifact.
        artifact_id -> BigInt,
        /// Per-artifact version number starting at 1.
        version -> BigInt,
        /// Content format.
        format -> Text,
        /// Version content.
        content -> Text,
        /// Optional rendered-diagram reference.
        render_url -> Nullable<Text>,
        /// Optional free-form note.
        notes -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Text,
    }
}

diesel::table! {
    /// Provenance links from artifacts to tasks, messages, or a manual marker.
    artifact_sources (id) {
        /// Generated source row identifier.
        id -> BigInt,
        /// Owning artifact.
        artifact_id -> BigInt,
        /// `task`, `message`, or `manual`.
        source_type -> Text,
        /// Referenced task or message identifier.
        source_id -> Nullable<BigInt>,
        /// Description carried by manual sources.
        description -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Text,
    }
}

diesel::table! {
    /// Rendered materialisations of one artifact version.
    artifact_exports (id) {
        /// Generated export identifier.
        id -> BigInt,
        /// Exported version row.
        artifact_version_id -> BigInt,
        /// Export format.
        format -> Text,
        /// Inline export content.
        content -> Nullable<Text>,
        /// External location of the export.
        location -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Text,
    }
}

diesel::joinable!(artifact_versions -> artifacts (artifact_id));
diesel::joinable!(artifact_sources -> artifacts (artifact_id));
diesel::joinable!(artifact_exports -> artifact_versions (artifact_version_id));

diesel::allow_tables_to_appear_in_same_query!(
    tasks,
    task_links,
    artifacts,
    artifact_versions,
    artifact_sources,
    artifact_exports,
);
