use anyhow::Result;
use rusqlite::params;
use shared_types::{RateConfig, RateTable};

use crate::database::AsyncDbConnection;

pub async fn get_rate_table(conn: AsyncDbConnection) -> Result<RateTable> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT rate_key, hq_allowance, ex_hq_allowance, outstation_allowance, km_rate
         FROM rates
         ORDER BY rate_key",
    )?;

    let table = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                RateConfig {
                    hq_allowance: row.get(1)?,
                    ex_hq_allowance: row.get(2)?,
                    outstation_allowance: row.get(3)?,
                    km_rate: row.get(4)?,
                },
            ))
        })?
        .collect::<Result<RateTable, _>>()?;

    Ok(table)
}

/// Replaces the whole table in one transaction
pub async fn replace_rate_table(conn: AsyncDbConnection, table: &RateTable) -> Result<()> {
    let mut conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let tx = conn.transaction()?;
    tx.execute("DELETE FROM rates", [])?;
    for (key, rate) in table {
        tx.execute(
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
    tx.commit()?;

    Ok(())
}
