// region:    --- Users
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash, password_salt)
    VALUES ($1, $2, $3, $4)
    RETURNING id, username, email, password_hash, password_salt, created_at
"#;

pub const GET_USER: &str =
    "SELECT id, username, email, password_hash, password_salt, created_at FROM users WHERE id = $1";

pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, password_salt, created_at FROM users WHERE username = $1";
// endregion: --- Users

// region:    --- Sessions
pub const INSERT_SESSION: &str = r#"
    INSERT INTO sessions (token, user_id, expires_at, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING token, user_id, expires_at, created_at
"#;

pub const GET_SESSION: &str =
    "SELECT token, user_id, expires_at, created_at FROM sessions WHERE token = $1 AND expires_at > $2";

pub const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = $1";

pub const DELETE_EXPIRED_SESSIONS: &str = "DELETE FROM sessions WHERE expires_at <= $1";
// endregion: --- Sessions

// region:    --- Categories
pub const GET_ALL_CATEGORIES: &str = "SELECT id, title FROM categories ORDER BY title";

pub const GET_CATEGORY: &str = "SELECT id, title FROM categories WHERE id = $1";
// endregion: --- Categories

// region:    --- Listings
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (owner_id, category_id, title, description, starting_bid, image_url)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, owner_id, category_id, title, description, starting_bid, image_url, active, winner_id, created_at
"#;

pub const GET_LISTING: &str = r#"
    SELECT id, owner_id, category_id, title, description, starting_bid, image_url, active, winner_id, created_at
    FROM listings
    WHERE id = $1
"#;

/// Row-locks the listing for the rest of the transaction.
pub const GET_LISTING_FOR_UPDATE: &str = r#"
    SELECT id, owner_id, category_id, title, description, starting_bid, image_url, active, winner_id, created_at
    FROM listings
    WHERE id = $1
    FOR UPDATE
"#;

pub const CLOSE_LISTING: &str = r#"
    UPDATE listings SET active = FALSE, winner_id = $2
    WHERE id = $1
    RETURNING id, owner_id, category_id, title, description, starting_bid, image_url, active, winner_id, created_at
"#;

pub const LIST_ACTIVE_LISTINGS: &str = r#"
    SELECT id, owner_id, category_id, title, description, starting_bid, image_url, active, winner_id, created_at
    FROM listings
    WHERE active
    ORDER BY created_at DESC, id DESC
    LIMIT $1 OFFSET $2
"#;

pub const LIST_CATEGORY_LISTINGS: &str = r#"
    SELECT id, owner_id, category_id, title, description, starting_bid, image_url, active, winner_id, created_at
    FROM listings
    WHERE active AND category_id = $1
    ORDER BY created_at DESC, id DESC
    LIMIT $2 OFFSET $3
"#;

pub const LIST_OWNER_LISTINGS: &str = r#"
    SELECT id, owner_id, category_id, title, description, starting_bid, image_url, active, winner_id, created_at
    FROM listings
    WHERE owner_id = $1
    ORDER BY created_at DESC, id DESC
    LIMIT $2 OFFSET $3
"#;

pub const LIST_WATCHLIST_LISTINGS: &str = r#"
    SELECT l.id, l.owner_id, l.category_id, l.title, l.description, l.starting_bid, l.image_url, l.active, l.winner_id, l.created_at
    FROM listings l
    JOIN watchlist w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY l.created_at DESC, l.id DESC
    LIMIT $2 OFFSET $3
"#;
// endregion: --- Listings

// region:    --- Bids
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (listing_id, user_id, amount)
    VALUES ($1, $2, $3)
    RETURNING id, listing_id, user_id, amount, created_at
"#;

pub const GET_HIGHEST_BID_AMOUNT: &str = "SELECT MAX(amount) FROM bids WHERE listing_id = $1";

/// Highest amount, earliest bid on ties.
pub const GET_HIGHEST_BID: &str = r#"
    SELECT id, listing_id, user_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY amount DESC, created_at ASC, id ASC
    LIMIT 1
"#;

pub const GET_TOP_BIDS: &str = r#"
    SELECT id, listing_id, user_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY amount DESC, created_at ASC, id ASC
    LIMIT $2
"#;
// endregion: --- Bids

// region:    --- Watchlist
pub const DELETE_WATCH: &str = "DELETE FROM watchlist WHERE user_id = $1 AND listing_id = $2";

pub const INSERT_WATCH: &str =
    "INSERT INTO watchlist (user_id, listing_id) VALUES ($1, $2) ON CONFLICT DO NOTHING";

pub const IS_WATCHING: &str =
    "SELECT EXISTS (SELECT 1 FROM watchlist WHERE user_id = $1 AND listing_id = $2)";
// endregion: --- Watchlist

// region:    --- Comments
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (listing_id, user_id, text)
    VALUES ($1, $2, $3)
    RETURNING id, listing_id, user_id, text, created_at
"#;

pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT id, listing_id, user_id, text, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY created_at ASC, id ASC
"#;
// endregion: --- Comments
