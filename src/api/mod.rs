//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Atrium, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Authentication (`/api/auth`)
//! - `POST /api/auth/register` - Register with email and password
//! - `POST /api/auth/login` - Login and receive JWT tokens
//! - `POST /api/auth/refresh` - Exchange a refresh token for new tokens
//! - `POST /api/auth/google` - Sign in with a Google ID token
//! - `POST /api/auth/otp/send` - Start phone verification
//! - `POST /api/auth/otp/confirm` - Confirm a phone code and link the number
//! - `POST /api/auth/reset` - Request a password reset token
//!
//! ## Calendar (`/api/calendar`, `/api/events`)
//! - `GET /api/calendar/grid` - Month grid with leading blank cells
//! - `GET /api/events` - Filtered events, date ascending
//! - `POST /api/events` - Create an event
//! - `GET /api/events/next-deadline` - Upcoming deadline card
//! - `DELETE /api/events/{id}` - Remove a user-created event
//!
//! ## Chat (`/api/chat`)
//! - `GET /api/chat/rooms/{room_id}/messages` - Current messages, oldest first
//! - `POST /api/chat/rooms/{room_id}/messages` - Send a message
//! - `GET /api/chat/rooms/{room_id}/stream` - Live snapshot feed (SSE)
//!
//! ## Pages (`/api/faculty`, `/api/categories`, ...)
//! - `GET /api/faculty` - Faculty directory search
//! - `GET|POST /api/faculty/{id}/actions` - Row options menu
//! - `GET /api/categories` - Course category cards
//! - `GET /api/contacts` - Campus contacts
//! - `GET /api/notifications` - Notification list with unread count
//! - `POST /api/notifications/{id}/read` - Mark a notification read
//! - `GET /api/reports` - Term summary figures
//!
//! ## Settings (`/api/settings`)
//! - `GET /api/settings` - Current persisted preferences
//! - `PUT /api/settings` - Update preferences
//!
//! ## Health (`/api/health`)
//! - `GET /api/health` - Health check endpoint
//!
//! # Authentication
//!
//! Everything outside `/api/auth` and `/api/health` requires a valid JWT
//! in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
