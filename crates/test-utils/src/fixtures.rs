// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures and sample SQL batches

/// Sample SQL statements and batches for testing
pub struct SqlFixtures;

impl SqlFixtures {
    // ===== Single statements =====

    /// Aggregate over one table
    pub const fn sum_total() -> &'static str {
        "SELECT SUM(amount) AS total FROM orders;"
    }

    /// Plain projection with a filter
    pub const fn filtered_select() -> &'static str {
        "SELECT id, email FROM users WHERE active = 1 ORDER BY email;"
    }

    /// Aliased LEFT JOIN with grouping
    pub const fn customer_totals() -> &'static str {
        "SELECT c.name AS customer, SUM(o.amount) AS lifetime_value
         FROM customers c
         LEFT JOIN orders o ON o.customer_id = c.id
         GROUP BY c.name
         ORDER BY lifetime_value DESC;"
    }

    /// Window function ranking
    pub const fn ranked_orders() -> &'static str {
        "SELECT customer_id,
                ROW_NUMBER() OVER (PARTITION BY customer_id ORDER BY created_at) AS order_rank
         FROM orders;"
    }

    /// CASE expression over two columns
    pub const fn order_bucket() -> &'static str {
        "SELECT CASE WHEN amount > 100 THEN 'large' ELSE status END AS bucket FROM orders;"
    }

    /// Type, text and date functions together
    pub const fn formatted_orders() -> &'static str {
        "SELECT CAST(amount AS DECIMAL(10, 2)) AS amount_decimal,
                UPPER(status) AS status_upper,
                DATE_TRUNC('month', created_at) AS order_month
         FROM orders
         WHERE notes LIKE '%gift%';"
    }

    /// INSERT ... SELECT into a reporting table
    pub const fn insert_report() -> &'static str {
        "INSERT INTO report (sum_total) SELECT SUM(total) FROM orders;"
    }

    /// CTE feeding the outer projection
    pub const fn cte_totals() -> &'static str {
        "WITH totals AS (SELECT customer_id, SUM(amount) AS spent FROM orders GROUP BY customer_id)
         SELECT customer_id, spent FROM totals;"
    }

    /// Literal-only projection, no lineage
    pub const fn literal_only() -> &'static str {
        "SELECT 1 AS one;"
    }

    // ===== Batches =====

    /// Three statements with comments and a semicolon inside a literal
    pub const fn mixed_batch() -> &'static str {
        "-- daily revenue
SELECT SUM(amount) AS total FROM orders;
/* customers; with spend */
SELECT c.name AS customer FROM customers c INNER JOIN orders o ON o.customer_id = c.id;
SELECT id FROM notes WHERE body = 'a;b';"
    }

    /// Two statements producing the same target column
    pub const fn conflicting_targets() -> &'static str {
        "INSERT INTO report (sum_total) SELECT SUM(total) FROM orders;
INSERT INTO report (sum_total) SELECT SUM(tax) FROM orders;"
    }

    // ===== Error cases =====

    /// Misspelled keywords, fails to parse
    pub const fn malformed() -> &'static str {
        "SELEC amount FRM orders;"
    }

    /// Unterminated string literal, fails to tokenize
    pub const fn unterminated_literal() -> &'static str {
        "SELECT 'open FROM orders"
    }

    /// Whitespace and comments only
    pub const fn comments_only() -> &'static str {
        "  -- nothing here\n/* still nothing */\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_are_semicolon_terminated() {
        for batch in [SqlFixtures::mixed_batch(), SqlFixtures::conflicting_targets()] {
            assert!(batch.trim_end().ends_with(';'));
        }
    }
}
