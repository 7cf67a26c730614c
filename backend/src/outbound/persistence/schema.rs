//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation. Regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Read-only poem catalog.
    poems (poem_id) {
        /// Primary key assigned by the external data load.
        poem_id -> Int4,
        /// Poem text shown to respondents.
        content -> Text,
        /// Descriptive topic label.
        topic -> Nullable<Text>,
        /// Provenance tag.
        source_type -> Nullable<Text>,
    }
}

diesel::table! {
    /// Pre-generated panel pool.
    survey_slots (slot_id) {
        /// Primary key assigned at seeding time.
        slot_id -> Int4,
        /// JSON array of poem ids, parsed at assignment time.
        poem_ids -> Text,
        /// Whether this slot is prioritised for early assignment.
        is_gold -> Bool,
        /// Successful assignments so far; capped at capacity by the
        /// conditional claim update.
        usage_count -> Int4,
    }
}

diesel::table! {
    /// Per-respondent in-progress answers.
    response_drafts (draft_id) {
        /// Surrogate primary key.
        draft_id -> Int4,
        /// Owning respondent.
        #[max_length = 254]
        email -> Varchar,
        /// Poem answered by this row.
        poem_id -> Int4,
        /// 1-based page position; unique per respondent.
        position -> Int4,
        /// Likert wire string or NULL when unanswered.
        clarity -> Nullable<Text>,
        /// Likert wire string or NULL when unanswered.
        devices -> Nullable<Text>,
        /// Likert wire string or NULL when unanswered.
        punctuation -> Nullable<Text>,
        /// Likert wire string or NULL when unanswered.
        grammar -> Nullable<Text>,
        /// Likert wire string or NULL when unanswered.
        originality -> Nullable<Text>,
        /// Free-text remark.
        extra -> Nullable<Text>,
        /// Touched on every page submission.
        last_updated -> Timestamptz,
    }
}

diesel::table! {
    /// Finalised answers; append-only.
    responses (response_id) {
        /// Surrogate primary key.
        response_id -> Int4,
        /// Owning respondent.
        #[max_length = 254]
        email -> Varchar,
        /// Poem rated by this row.
        poem_id -> Int4,
        /// Likert wire string or NULL when left unanswered.
        clarity -> Nullable<Text>,
        /// Likert wire string or NULL when left unanswered.
        devices -> Nullable<Text>,
        /// Likert wire string or NULL when left unanswered.
        punctuation -> Nullable<Text>,
        /// Likert wire string or NULL when left unanswered.
        grammar -> Nullable<Text>,
        /// Likert wire string or NULL when left unanswered.
        originality -> Nullable<Text>,
        /// Free-text remark.
        extra -> Nullable<Text>,
        /// Finalisation timestamp.
        created_at -> Timestamptz,
    }
}
