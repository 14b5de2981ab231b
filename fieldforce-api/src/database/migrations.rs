use rusqlite::{params, Connection};

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id VARCHAR PRIMARY KEY,
            email VARCHAR NOT NULL,
            display_name VARCHAR NOT NULL,
            role VARCHAR NOT NULL CHECK (role IN ('ADMIN', 'ZM', 'RM', 'ASM', 'MR')),
            status VARCHAR NOT NULL CHECK (status IN ('TRAINEE', 'CONFIRMED')),
            hq_location VARCHAR NOT NULL DEFAULT '',
            reporting_manager_id VARCHAR,
            territories VARCHAR NOT NULL DEFAULT '[]',
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS rates (
            rate_key VARCHAR PRIMARY KEY,
            hq_allowance DOUBLE NOT NULL,
            ex_hq_allowance DOUBLE NOT NULL,
            outstation_allowance DOUBLE NOT NULL,
            km_rate DOUBLE NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Entries are a JSON array of ExpenseEntry, one per calendar day
    conn.execute(
        "CREATE TABLE IF NOT EXISTS expense_sheets (
            id VARCHAR PRIMARY KEY,
            user_id VARCHAR NOT NULL,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            status VARCHAR NOT NULL DEFAULT 'DRAFT'
                CHECK (status IN ('DRAFT', 'SUBMITTED', 'APPROVED_ASM', 'APPROVED_ADMIN', 'REJECTED')),
            entries VARCHAR NOT NULL,
            submitted_at BIGINT,
            approved_by_asm_at BIGINT,
            approved_by_admin_at BIGINT,
            rejection_reason VARCHAR,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            UNIQUE(user_id, year, month)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS attendance (
            id VARCHAR PRIMARY KEY,
            user_id VARCHAR NOT NULL,
            date VARCHAR NOT NULL,
            punch_in VARCHAR,
            punch_outs VARCHAR NOT NULL DEFAULT '[]',
            is_synced_to_sheets BOOLEAN NOT NULL DEFAULT 0,
            updated_at BIGINT NOT NULL,
            UNIQUE(user_id, date)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_users_manager ON users(reporting_manager_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_sheets_status ON expense_sheets(status)",
        [],
    )?;

    seed_default_rates(conn)?;

    Ok(())
}

/// Fill the rate table on first start; an existing table is left alone
fn seed_default_rates(conn: &Connection) -> anyhow::Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM rates", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    let now = chrono::Utc::now().timestamp();
    let table = engine::default_rate_table();
    for (key, rate) in &table {
        conn.execute(
            "INSERT INTO rates (rate_key, hq_allowance, ex_hq_allowance, outstation_allowance, km_rate, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                key,
                rate.hq_allowance,
                rate.ex_hq_allowance,
                rate.outstation_allowance,
                rate.km_rate,
                now
            ],
        )?;
    }
    tracing::info!("Seeded {} default rate rows", table.len());

    Ok(())
}
