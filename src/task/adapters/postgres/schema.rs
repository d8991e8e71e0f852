//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records holding the current state.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Free-text task label.
        #[max_length = 30]
        name -> Varchar,
        /// Unique external identifier.
        #[max_length = 200]
        identifier -> Varchar,
        /// Current lifecycle state.
        #[max_length = 20]
        state -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last state change timestamp.
        modified_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recorded HTTP service calls.
    http_services (id) {
        /// Service record identifier.
        id -> BigInt,
        /// Upstream URL of the call.
        #[max_length = 200]
        upstream_url -> Varchar,
        /// HTTP method of the call.
        #[max_length = 6]
        method -> Varchar,
        /// Request headers.
        headers -> Nullable<Jsonb>,
        /// Request payload.
        data_in -> Nullable<Jsonb>,
        /// Response payload.
        data_out -> Nullable<Jsonb>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only transition log.
    task_transitions (id) {
        /// Transition identifier, increasing with every append.
        id -> BigInt,
        /// Owning task.
        task_id -> Uuid,
        /// Kind of the referenced service record.
        #[max_length = 20]
        service_kind -> Nullable<Varchar>,
        /// Identifier of the referenced service record within its kind.
        service_id -> Nullable<BigInt>,
        /// State the task was set to.
        #[max_length = 20]
        state -> Varchar,
        /// Append timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(task_transitions -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_transitions, http_services);
