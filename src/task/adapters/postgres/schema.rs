//! Diesel schema for task persistence.

diesel::table! {
    /// Category records.
    categories (id) {
        /// Category identifier.
        id -> Uuid,
        /// Category label.
        #[max_length = 50]
        name -> Varchar,
    }
}

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Due date.
        due_date -> Date,
        /// Priority storage value.
        #[max_length = 10]
        priority -> Varchar,
        /// Status storage value.
        #[max_length = 20]
        status -> Varchar,
        /// Owning category.
        category_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> categories (category_id));
diesel::allow_tables_to_appear_in_same_query!(categories, tasks);
