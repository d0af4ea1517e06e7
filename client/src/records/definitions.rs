//! Record types for each API resource.

use super::Timestamp;

spark_record! {
    /// A user or bot account.
    Person {
        /// Unique person identifier.
        id: String,
        /// Email addresses registered to the person.
        emails: Vec<String>,
        /// Full name as displayed in clients.
        display_name: String,
        /// Nickname, when set.
        nick_name: String,
        /// Given name.
        first_name: String,
        /// Family name.
        last_name: String,
        /// Avatar image URL.
        avatar: String,
        /// Organisation the person belongs to.
        org_id: String,
        /// Role identifiers assigned to the person.
        roles: Vec<String>,
        /// License identifiers allocated to the person.
        licenses: Vec<String>,
        /// Creation time.
        created: Timestamp,
        /// Time zone name.
        timezone: String,
        /// Time of last recorded activity.
        last_activity: Timestamp,
        /// Presence status, e.g. `active`.
        status: String,
        /// Account type, `person` or `bot`.
        person_type: String as "type",
    }
}

spark_record! {
    /// A room (space) where messages are exchanged.
    Room {
        /// Unique room identifier.
        id: String,
        /// Room title.
        title: String,
        /// `direct` or `group`.
        room_type: String as "type",
        /// Whether the room is moderated.
        is_locked: bool,
        /// Owning team, for team rooms.
        team_id: String,
        /// Time of last activity in the room.
        last_activity: Timestamp,
        /// Person who created the room.
        creator_id: String,
        /// Creation time.
        created: Timestamp,
    }
}

spark_record! {
    /// A person's membership in a room.
    Membership {
        /// Unique membership identifier.
        id: String,
        /// Room the membership belongs to.
        room_id: String,
        /// Member's person identifier.
        person_id: String,
        /// Member's email address.
        person_email: String,
        /// Member's display name.
        person_display_name: String,
        /// Member's organisation.
        person_org_id: String,
        /// Whether the member moderates the room.
        is_moderator: bool,
        /// Whether the member is a monitor.
        is_monitor: bool,
        /// Creation time.
        created: Timestamp,
    }
}

spark_record! {
    /// A message posted to a room or sent directly to a person.
    Message {
        /// Unique message identifier.
        id: String,
        /// Room the message was posted to.
        room_id: String,
        /// `direct` or `group`.
        room_type: String,
        /// Recipient person identifier for direct messages.
        to_person_id: String,
        /// Recipient email for direct messages.
        to_person_email: String,
        /// Plain-text body.
        text: String,
        /// Markdown body.
        markdown: String,
        /// Rendered HTML body.
        html: String,
        /// Attachment URLs.
        files: Vec<String>,
        /// Sender's person identifier.
        person_id: String,
        /// Sender's email.
        person_email: String,
        /// People mentioned in the message.
        mentioned_people: Vec<String>,
        /// Creation time.
        created: Timestamp,
    }
}

spark_record! {
    /// A team grouping several rooms.
    Team {
        /// Unique team identifier.
        id: String,
        /// Team name.
        name: String,
        /// Person who created the team.
        creator_id: String,
        /// Creation time.
        created: Timestamp,
    }
}

spark_record! {
    /// A person's membership in a team.
    TeamMembership {
        /// Unique team membership identifier.
        id: String,
        /// Team the membership belongs to.
        team_id: String,
        /// Member's person identifier.
        person_id: String,
        /// Member's email address.
        person_email: String,
        /// Member's display name.
        person_display_name: String,
        /// Member's organisation.
        person_org_id: String,
        /// Whether the member moderates the team.
        is_moderator: bool,
        /// Creation time.
        created: Timestamp,
    }
}

spark_record! {
    /// A registered webhook.
    Webhook {
        /// Unique webhook identifier.
        id: String,
        /// Human-readable name.
        name: String,
        /// URL events are delivered to.
        target_url: String,
        /// Resource the webhook watches, e.g. `messages`.
        resource: String,
        /// Event that triggers delivery, e.g. `created`.
        event: String,
        /// Filter applied to events.
        filter: String,
        /// Secret used to sign payloads.
        secret: String,
        /// Delivery status.
        status: String,
        /// Organisation owning the webhook.
        org_id: String,
        /// Person who created the webhook.
        created_by: String,
        /// Application that created the webhook.
        app_id: String,
        /// `creator` or `org`.
        owned_by: String,
        /// Creation time.
        created: Timestamp,
    }
}

spark_record! {
    /// OAuth tokens returned by the token exchange.
    AccessToken {
        /// Bearer token for API calls.
        access_token: String as "access_token",
        /// Seconds until `access_token` expires.
        expires_in: u64 as "expires_in",
        /// Token used to obtain a new access token.
        refresh_token: String as "refresh_token",
        /// Seconds until `refresh_token` expires.
        refresh_token_expires_in: u64 as "refresh_token_expires_in",
    }
}
