// SPDX-FileCopyrightText: 2026 Stayflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stayflow doctor`: configuration and storage health checks.

use stayflow_config::StayflowConfig;
use stayflow_core::StayflowError;

pub async fn run(config: &StayflowConfig) -> Result<(), StayflowError> {
    println!("config: ok (assistant `{}`)", config.agent.name);
    println!(
        "autonomy: default level {:?}, {} action override(s)",
        config.autonomy.default_level,
        config.autonomy.action_levels.len()
    );

    let db = stayflow_storage::open_from_config(&config.storage).await?;
    println!("storage: ok ({})", config.storage.database_path);

    let pending = stayflow_storage::queries::approvals::pending(&db, 100).await?;
    println!("approvals: {} pending", pending.len());

    db.close().await?;
    println!("doctor: all checks passed");
    Ok(())
}
