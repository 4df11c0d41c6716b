//! Diesel schema for remote task persistence.

diesel::table! {
    /// Task records owned by authenticated users.
    tasks (id) {
        /// Task identifier, generated by the client.
        id -> Uuid,
        /// Owning user identifier.
        user_id -> Uuid,
        /// Task title.
        title -> Text,
        /// Task description, empty when none was given.
        description -> Nullable<Text>,
        /// Raw due date text.
        due_date -> Nullable<Text>,
        /// Raw due time text.
        due_time -> Nullable<Text>,
        /// Completion flag.
        completed -> Bool,
        /// Stack length observed when the task was pushed.
        stack_position -> Int4,
    }
}
