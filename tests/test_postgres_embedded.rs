#![cfg(feature = "test-utils")]

use sql_session::prelude::*;
use sql_session::test_utils::{setup_postgres_embedded, stop_postgres_embedded};

fn assert_single_connection(client: &DbClient) {
    let status = client.handle_status();
    assert!(status.open <= 1, "handle opened {} connections", status.open);
    assert!(status.idle <= 1, "handle kept {} idle connections", status.idle);
}

async fn scalar(client: &mut DbClient, sql: &str, column: &str) -> Result<String, DbClientError> {
    let result = client.query(sql).await?.expect("statement should return rows");
    Ok(result.rows()[0][column].clone())
}

#[test]
fn embedded_postgres_session_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let pg = setup_postgres_embedded("session_lifecycle")?;
    let cfg = pg.config();

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(async move {
        let mut client = DbClient::connect(cfg).await?;
        assert_eq!(client.flavor(), Flavor::Postgres);

        // NULL and the text 'NULL' render identically
        let result = client
            .query("SELECT 1 AS a, NULL AS b, 'NULL' AS c")
            .await?
            .expect("select returns a row set");
        assert_eq!(result.columns(), ["a", "b", "c"]);
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows()[0]["a"], "1");
        assert_eq!(result.rows()[0]["b"], NULL_MARKER);
        assert_eq!(result.rows()[0]["c"], NULL_MARKER);
        assert_single_connection(&client);

        // statements without a row set
        assert!(client
            .query("CREATE TABLE people (id INT PRIMARY KEY, name TEXT)")
            .await?
            .is_none());
        assert!(client
            .query("INSERT INTO people VALUES (1, 'ann'), (2, NULL)")
            .await?
            .is_none());
        assert!(client
            .query("UPDATE people SET name = 'bo' WHERE id = 2")
            .await?
            .is_none());

        let result = client
            .query("SELECT id, name FROM people ORDER BY id")
            .await?
            .expect("select returns a row set");
        assert_eq!(result.row_values(0).unwrap(), vec!["1", "ann"]);
        assert_eq!(result.row_values(1).unwrap(), vec!["2", "bo"]);
        for row in result.rows() {
            assert_eq!(row.len(), result.columns().len());
        }

        // an empty SELECT still reports its columns
        let empty = client
            .query("SELECT id, name FROM people WHERE id < 0")
            .await?
            .expect("empty select is still a row set");
        assert!(empty.is_empty());
        assert_eq!(empty.columns(), ["id", "name"]);

        // RETURNING makes DML produce rows
        let returned = client
            .query("DELETE FROM people WHERE id = 1 RETURNING name")
            .await?
            .expect("returning produces a row set");
        assert_eq!(returned.rows()[0]["name"], "ann");

        // invalid SQL fails without poisoning the session
        let err = client.query("SELEKT nothing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryExecution);
        assert_eq!(scalar(&mut client, "SELECT 2 AS two", "two").await?, "2");
        assert_single_connection(&client);

        // kill the cached session from the server side; the next query reconnects
        let first_pid = scalar(&mut client, "SELECT pg_backend_pid() AS pid", "pid").await?;
        let _ = client
            .query("SELECT pg_terminate_backend(pg_backend_pid())")
            .await;
        let second_pid = scalar(&mut client, "SELECT pg_backend_pid() AS pid", "pid").await?;
        assert_ne!(first_pid, second_pid);
        assert_single_connection(&client);

        client.destroy().await?;

        // safe mode has no Postgres session setting; queries still run
        let mut safe_cfg = pg.config();
        safe_cfg.safe_mode = true;
        let mut safe = DbClient::connect(safe_cfg).await?;
        assert_eq!(scalar(&mut safe, "SELECT 'ok' AS s", "s").await?, "ok");
        safe.destroy().await?;

        Ok::<_, DbClientError>(pg)
    });

    match outcome {
        Ok(pg) => {
            stop_postgres_embedded(pg);
            Ok(())
        }
        Err(err) => Err(error_chain(&err).into()),
    }
}
