use super::*;
use crate::config::{TableOptions, TimestampFormat};
use crate::error::DbiError;
use crate::statement::Raw;
use crate::value::Value;

fn users() -> QueryBuilder {
    let mut qb = QueryBuilder::new();
    qb.table("users");
    qb
}

fn built(mut qb: QueryBuilder) -> QueryBuilder {
    qb.build().unwrap();
    qb
}

fn placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

// ==================== BuildHandler ====================

#[test]
fn test_table_prefix() {
    let mut h = BuildHandler::new();
    h.set_table("users");
    assert_eq!(h.with_table_prefix("name"), "`users`.`name`");
    assert_eq!(h.with_table_prefix("posts.title"), "`posts`.`title`");
    assert_eq!(h.with_table_prefix("a.b.c"), "`a`.`b.c`");
}

#[test]
fn test_quote_does_not_escape() {
    assert_eq!(BuildHandler::quote("we`ird"), "`we`ird`");
}

#[test]
fn test_statement_helpers() {
    let mut h = BuildHandler::new();
    h.set_table("users");

    let col = h.column_statement("name".into());
    assert_eq!(col.text(), "`users`.`name`");
    assert!(col.bindings().is_empty());

    let param = h.value_statement(42.into());
    assert_eq!(param.text(), "?");
    assert_eq!(param.bindings(), &[Value::Int(42)]);

    let raw = h.column_statement(Raw::with_bindings("LOWER(?)", ["X"]).into());
    assert_eq!(raw.text(), "LOWER(?)");
    assert_eq!(raw.bindings(), &[Value::from("X")]);
}

// ==================== SELECT ====================

#[test]
fn test_simple_select() {
    let mut qb = users();
    qb.select("name");
    let qb = built(qb);
    assert_eq!(qb.query(), "SELECT `users`.`name` FROM `users`");
    assert!(qb.parameters().is_empty());
}

#[test]
fn test_select_multiple_columns() {
    let mut qb = users();
    qb.select("id").select("name").select("email");
    let qb = built(qb);
    assert_eq!(
        qb.query(),
        "SELECT `users`.`id`, `users`.`name`, `users`.`email` FROM `users`"
    );
}

#[test]
fn test_select_all_other_table() {
    let mut qb = users();
    qb.select_all(Some("posts"));
    assert_eq!(built(qb).query(), "SELECT `posts`.* FROM `users`");
}

#[test]
fn test_select_as_and_raw() {
    let mut qb = users();
    qb.select_as("COUNT(*)", "total");
    assert_eq!(
        built(qb).query(),
        "SELECT `users`.`COUNT(*)` AS total FROM `users`"
    );

    let mut qb = users();
    qb.select(Raw::new("COUNT(*)"));
    assert_eq!(built(qb).query(), "SELECT COUNT(*) FROM `users`");
}

#[test]
fn test_select_as_keeps_raw_bindings() {
    let mut qb = users();
    qb.select_as(Raw::with_bindings("IF(`age` > ?, 1, 0)", [18]), "adult");
    let qb = built(qb);
    assert_eq!(
        qb.query(),
        "SELECT IF(`age` > ?, 1, 0) AS adult FROM `users`"
    );
    assert_eq!(qb.parameters(), &[Value::Int(18)]);
}

// ==================== WHERE ====================

#[test]
fn test_where_single() {
    let mut qb = users();
    qb.select_all(None).and_where("status", "=", "active");
    let qb = built(qb);
    assert_eq!(
        qb.query(),
        "SELECT `users`.* FROM `users` WHERE `users`.`status` = ?"
    );
    assert_eq!(qb.parameters(), &[Value::from("active")]);
}

#[test]
fn test_where_and_or() {
    let mut qb = users();
    qb.select_all(None)
        .and_where("role", "=", "admin")
        .or_where("role", "=", "moderator");
    let qb = built(qb);
    assert_eq!(
        qb.query(),
        "SELECT `users`.* FROM `users` WHERE `users`.`role` = ? OR `users`.`role` = ?"
    );
    assert_eq!(
        qb.parameters(),
        &[Value::from("admin"), Value::from("moderator")]
    );
}

#[test]
fn test_where_group_and() {
    let mut qb = users();
    qb.select_all(None)
        .and_where("status", "=", "active")
        .and_where_group(|g| {
            g.and_where("role", "=", "admin")
                .or_where("role", "=", "moderator");
        });
    let qb = built(qb);
    assert!(qb.query().ends_with(
        "WHERE `users`.`status` = ? AND  ( `users`.`role` = ? OR `users`.`role` = ? )"
    ));
    assert_eq!(
        qb.parameters(),
        &[
            Value::from("active"),
            Value::from("admin"),
            Value::from("moderator")
        ]
    );
}

#[test]
fn test_where_group_or() {
    let mut qb = users();
    qb.select_all(None)
        .and_where("status", "=", "active")
        .or_where_group(|g| {
            g.and_where("age", "<", 18).and_where("age", ">", 65);
        });
    let qb = built(qb);
    assert!(qb.query().contains(
        "WHERE `users`.`status` = ? OR  ( `users`.`age` < ? AND `users`.`age` > ? )"
    ));
}

#[test]
fn test_where_group_first_entry() {
    let mut qb = users();
    qb.select_all(None).or_where_group(|g| {
        g.and_where("a", "=", 1).or_where("b", "=", 2);
    });
    assert!(built(qb)
        .query()
        .ends_with("WHERE  ( `users`.`a` = ? OR `users`.`b` = ? )"));
}

#[test]
fn test_empty_where_group_is_dropped() {
    let mut qb = users();
    qb.select_all(None).and_where_group(|_| {});
    assert_eq!(built(qb).query(), "SELECT `users`.* FROM `users`");
}

#[test]
fn test_where_raw_value() {
    let mut qb = users();
    qb.select_all(None)
        .and_where("active", "IS", Raw::new("TRUE"))
        .and_where("created", ">", Raw::with_bindings("UNIX_TIMESTAMP() - ?", [3600]));
    let qb = built(qb);
    assert!(qb.query().ends_with(
        "WHERE `users`.`active` IS TRUE AND `users`.`created` > UNIX_TIMESTAMP() - ?"
    ));
    assert_eq!(qb.parameters(), &[Value::Int(3600)]);
}

#[test]
fn test_placeholders_match_parameters() {
    let mut qb = QueryBuilder::new();
    qb.table("orders")
        .select(Raw::with_bindings("COALESCE(`note`, ?)", [""]))
        .and_where("status", "=", "paid")
        .or_where_group(|g| {
            g.and_where("total", ">", 100)
                .or_where("vip", "=", true)
                .or_where("region", "IN", Raw::with_bindings("(?, ?)", ["eu", "us"]));
        })
        .group_by("user_id")
        .and_having("COUNT(*)", ">", 2)
        .limit(20)
        .offset(40);
    let qb = built(qb);

    assert_eq!(placeholders(qb.query()), qb.parameters().len());
    assert_eq!(
        qb.parameters(),
        &[
            Value::from(""),
            Value::from("paid"),
            Value::Int(100),
            Value::Bool(true),
            Value::from("eu"),
            Value::from("us"),
            Value::Int(2),
            Value::Int(20),
            Value::Int(40),
        ]
    );
}

// ==================== Joins ====================

#[test]
fn test_inner_join() {
    let mut qb = QueryBuilder::new();
    qb.table("posts").select_all(None);
    qb.inner_join("users").on("posts.user_id", "=", "users.id");
    assert_eq!(
        built(qb).query(),
        "SELECT `posts`.* FROM `posts` INNER JOIN `users` ON `posts`.`user_id` = `users`.`id`"
    );
}

#[test]
fn test_multiple_joins_render_before_where() {
    let mut qb = QueryBuilder::new();
    qb.table("posts").select_all(None).and_where("status", "=", 1);
    qb.left_join("users").on("posts.user_id", "=", "users.id");
    qb.right_join("categories")
        .on("posts.category_id", "=", "categories.id");
    assert_eq!(
        built(qb).query(),
        "SELECT `posts`.* FROM `posts` \
         LEFT JOIN `users` ON `posts`.`user_id` = `users`.`id` \
         RIGHT JOIN `categories` ON `posts`.`category_id` = `categories`.`id` \
         WHERE `posts`.`status` = ?"
    );
}

#[test]
fn test_join_reused_per_table() {
    let mut qb = QueryBuilder::new();
    qb.table("posts").select_all(None);
    qb.left_join("users").on("posts.user_id", "=", "users.id");
    let join = qb.left_join("users");
    join.on("posts.status", "=", "users.status");
    let qb = built(qb);
    assert_eq!(qb.query().matches("JOIN").count(), 1);
    assert!(qb.query().contains(
        "LEFT JOIN `users` ON `posts`.`user_id` = `users`.`id` AND `posts`.`status` = `users`.`status`"
    ));
}

#[test]
fn test_join_builder_alias_and_prefix() {
    let mut join = JoinBuilder::new("users", JoinType::Left);
    join.alias("u").on("posts.user_id", "=", "u.id");
    join.build().unwrap();
    assert_eq!(
        join.query(),
        "LEFT JOIN `users` AS `u` ON `posts`.`user_id` = `u`.`id`"
    );

    let mut join = JoinBuilder::new("users", JoinType::Inner);
    join.on("id", "=", "author_id");
    join.on_with("posts.flag", "=", "flag", false);
    join.build().unwrap();
    assert_eq!(
        join.query(),
        "INNER JOIN `users` ON `users`.`id` = `users`.`author_id` AND `posts`.`flag` = `flag`"
    );
}

#[test]
fn test_join_without_on() {
    let mut join = JoinBuilder::new("settings", JoinType::Inner);
    join.build().unwrap();
    assert_eq!(join.query(), "INNER JOIN `settings`");
}

#[test]
fn test_join_set_type() {
    let mut join = JoinBuilder::new("orders", JoinType::Inner);
    join.set_type("right").unwrap();
    assert_eq!(join.join_type(), JoinType::Right);

    let err = join.set_type("invalid").unwrap_err();
    assert!(matches!(err, DbiError::UnknownJoinType(ref t) if t == "invalid"));
    assert!(err.to_string().contains("Unknown join type"));
}

// ==================== ORDER BY / GROUP BY / HAVING / LIMIT ====================

#[test]
fn test_order_by() {
    let mut qb = users();
    qb.select_all(None)
        .order_by("status", "ASC")
        .order_by("name", "ASC");
    assert_eq!(
        built(qb).query(),
        "SELECT `users`.* FROM `users` ORDER BY `users`.`status` ASC, `users`.`name` ASC"
    );
}

#[test]
fn test_order_by_replaces_same_column() {
    let mut qb = users();
    qb.select_all(None)
        .order_by("name", "ASC")
        .order_by("name", "DESC");
    assert_eq!(
        built(qb).query(),
        "SELECT `users`.* FROM `users` ORDER BY `users`.`name` DESC"
    );
}

#[test]
fn test_group_by_and_having() {
    let mut qb = QueryBuilder::new();
    qb.table("sales")
        .select_all(None)
        .group_by("year")
        .group_by("month")
        .and_having("COUNT(*)", ">", 5)
        .and_having("SUM(total)", ">", 1000);
    let qb = built(qb);
    assert!(qb.query().contains("GROUP BY `sales`.`year`, `sales`.`month`"));
    assert!(qb
        .query()
        .contains("HAVING `sales`.`COUNT(*)` > ? AND `sales`.`SUM(total)` > ?"));
    assert_eq!(qb.parameters(), &[Value::Int(5), Value::Int(1000)]);
}

#[test]
fn test_having_group() {
    let mut qb = QueryBuilder::new();
    qb.table("orders")
        .select_all(None)
        .group_by("user_id")
        .and_having_group(|g| {
            g.and_where("COUNT(*)", ">", 5).or_where("COUNT(*)", "<", 10);
        });
    assert!(built(qb)
        .query()
        .contains("HAVING  ( `orders`.`COUNT(*)` > ? OR `orders`.`COUNT(*)` < ? )"));
}

#[test]
fn test_limit_offset() {
    let mut qb = users();
    qb.select_all(None).limit(10).offset(20);
    let qb = built(qb);
    assert_eq!(qb.query(), "SELECT `users`.* FROM `users` LIMIT ? OFFSET ?");
    assert_eq!(qb.parameters(), &[Value::Int(10), Value::Int(20)]);
}

#[test]
fn test_offset_without_limit_is_ignored() {
    let mut qb = users();
    qb.select_all(None).offset(20);
    let qb = built(qb);
    assert_eq!(qb.query(), "SELECT `users`.* FROM `users`");
    assert!(qb.parameters().is_empty());
}

#[test]
fn test_clause_order_is_fixed() {
    let mut qb = QueryBuilder::new();
    qb.table("orders")
        .limit(20)
        .order_by("total_spent", "DESC")
        .and_having("COUNT(*)", ">", 5)
        .group_by("user_id")
        .and_where("status", "=", "completed")
        .select("user_id")
        .select_as("SUM(total)", "total_spent");
    let qb = built(qb);
    assert_eq!(
        qb.query(),
        "SELECT `orders`.`user_id`, `orders`.`SUM(total)` AS total_spent FROM `orders` \
         WHERE `orders`.`status` = ? GROUP BY `orders`.`user_id` \
         HAVING `orders`.`COUNT(*)` > ? ORDER BY `orders`.`total_spent` DESC LIMIT ?"
    );
    assert_eq!(
        qb.parameters(),
        &[Value::from("completed"), Value::Int(5), Value::Int(20)]
    );
}

#[test]
fn test_build_twice_appends() {
    let mut qb = users();
    qb.select("id");
    qb.build().unwrap();
    qb.build().unwrap();
    assert_eq!(
        qb.query(),
        "SELECT `users`.`id` FROM `users`SELECT `users`.`id` FROM `users`"
    );
}

// ==================== Intents ====================

#[test]
fn test_empty_build_fails() {
    let mut qb = users();
    assert!(matches!(qb.build(), Err(DbiError::EmptyBuild)));
}

#[test]
fn test_build_without_table_fails() {
    let mut qb = QueryBuilder::new();
    qb.select("id");
    assert!(matches!(qb.build(), Err(DbiError::MissingTable)));
}

#[test]
fn test_conflicting_intents() {
    let mut qb = users();
    qb.drop_table().unwrap();
    let err = qb.rename("people").unwrap_err();
    assert!(err.is_conflicting_intent());
    assert!(matches!(
        err,
        DbiError::ConflictingIntent {
            existing: "drop",
            requested: "rename"
        }
    ));

    let mut qb = users();
    qb.select("id");
    assert!(qb.create(|_| Ok(())).unwrap_err().is_conflicting_intent());

    let mut qb = users();
    qb.drop_table().unwrap();
    qb.select("id");
    assert!(qb.build().unwrap_err().is_conflicting_intent());
}

#[test]
fn test_ddl_requires_table() {
    let mut qb = QueryBuilder::new();
    assert!(matches!(qb.drop_table(), Err(DbiError::MissingTable)));
}

#[test]
fn test_create_table() {
    let mut qb = users();
    qb.create(|t| {
        t.add_column("id", "int")?.primary_key(true);
        t.add_column("name", "varchar")?.length(255).not_null();
        t.add_column("email", "varchar")?.length(255).not_null();
        Ok(())
    })
    .unwrap();
    let qb = built(qb);
    assert_eq!(qb.intent_name(), "create");
    assert_eq!(
        qb.query(),
        "CREATE TABLE `users` (`id` INT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
         `name` VARCHAR(255) NOT NULL, `email` VARCHAR(255) NOT NULL) COLLATE 'utf8_unicode_ci'"
    );
    assert_eq!(qb.statements().len(), 1);
}

#[test]
fn test_create_table_with_options() {
    let mut qb = users();
    qb.table_options(
        TableOptions::new()
            .with_engine("InnoDB")
            .with_charset("utf8mb4")
            .with_collation("utf8mb4_unicode_ci"),
    );
    qb.create(|t| {
        t.id()?;
        Ok(())
    })
    .unwrap();
    assert_eq!(
        built(qb).query(),
        "CREATE TABLE `users` (`id` INT(11) NOT NULL AUTO_INCREMENT PRIMARY KEY) \
         ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE 'utf8mb4_unicode_ci'"
    );
}

#[test]
fn test_create_callback_error_propagates() {
    let mut qb = users();
    let err = qb
        .create(|t| {
            t.add_column("bad name", "int")?;
            Ok(())
        })
        .unwrap_err();
    assert!(err.is_invalid_identifier());
    // The failed create leaves no intent behind.
    assert!(matches!(qb.build(), Err(DbiError::EmptyBuild)));
}

#[test]
fn test_alter_table() {
    let mut qb = users();
    qb.alter(|t| {
        t.add_column("phone", "varchar")?.length(20);
        t.change_column("name")?.column_type("varchar")?.length(300);
        Ok(())
    })
    .unwrap();
    assert_eq!(
        built(qb).query(),
        "ALTER TABLE `users` ADD `phone` VARCHAR(20) NOT NULL, CHANGE `name` `name` VARCHAR(300) NOT NULL"
    );
}

#[test]
fn test_drop_and_rename() {
    let mut qb = QueryBuilder::new();
    qb.table("old_table").drop_table().unwrap();
    assert_eq!(built(qb).query(), "DROP TABLE `old_table`");

    let mut qb = QueryBuilder::new();
    qb.table("users").rename("people").unwrap();
    assert_eq!(built(qb).query(), "RENAME TABLE `users` TO `people`");

    let mut qb = users();
    assert!(qb.rename("").is_err());
}

#[test]
fn test_create_with_timestamps_yields_separate_statements() {
    let mut qb = QueryBuilder::new();
    qb.table("posts").create(|t| {
        t.id()?;
        t.timestamps();
        Ok(())
    })
    .unwrap();
    let qb = built(qb);

    assert!(!qb.query().contains("TRIGGER"));
    let statements = qb.statements();
    assert_eq!(statements.len(), 5);
    assert!(statements[0].starts_with("CREATE TABLE `posts`"));
    assert_eq!(statements[1], "DROP TRIGGER IF EXISTS `posts_created_trigger`");
    assert!(statements[2].starts_with("CREATE TRIGGER `posts_created_trigger`"));
    assert_eq!(statements[3], "DROP TRIGGER IF EXISTS `posts_updated_trigger`");
    assert!(statements[4].starts_with("CREATE TRIGGER `posts_updated_trigger`"));
}

#[test]
fn test_table_options_timestamp_format() {
    let mut qb = QueryBuilder::new();
    qb.table("events")
        .table_options(TableOptions::new().with_timestamp_format(TimestampFormat::DateTime));
    qb.create(|t| {
        t.timestamps();
        Ok(())
    })
    .unwrap();
    let qb = built(qb);
    assert!(qb
        .query()
        .contains("(`created` TIMESTAMP NOT NULL, `updated` TIMESTAMP NOT NULL)"));
    assert!(qb.trigger_statements()[3].ends_with("SET NEW.`updated` = CURRENT_TIMESTAMP"));
}

#[test]
fn test_table_changed_after_create_retargets_ddl() {
    let mut qb = QueryBuilder::new();
    qb.table("a")
        .create(|t| {
            t.add_column("user_id", "int")?;
            t.add_foreign_key("user_id", "users", "id")?;
            t.timestamps();
            Ok(())
        })
        .unwrap();
    qb.table("b");
    let qb = built(qb);

    assert!(qb.query().starts_with("CREATE TABLE `b` ("));
    assert!(qb.query().contains("CONSTRAINT `fk_b_user_id_users_id`"));
    let statements = qb.statements();
    assert_eq!(statements[1], "DROP TRIGGER IF EXISTS `b_created_trigger`");
    assert!(statements[2].contains("BEFORE INSERT ON `b`"));
    assert!(statements[4].contains("BEFORE UPDATE ON `b`"));
    assert!(statements.iter().all(|s| !s.contains("`a")));
}

#[test]
fn test_table_changed_after_alter_retargets_foreign_key_drops() {
    let mut qb = QueryBuilder::new();
    qb.table("a")
        .alter(|t| {
            t.drop_foreign_key("user_id", "users", "id")?;
            t.drop_foreign_key_by_identifier("legacy_fk")?;
            Ok(())
        })
        .unwrap();
    qb.table("b");
    let qb = built(qb);

    assert_eq!(
        qb.query(),
        "ALTER TABLE `b` DROP INDEX `fk_b_user_id_users_id`, DROP FOREIGN KEY `fk_b_user_id_users_id`, \
         DROP INDEX `legacy_fk`, DROP FOREIGN KEY `legacy_fk`"
    );
}

#[test]
fn test_options_changed_after_create_apply_timestamp_format() {
    let mut qb = users();
    qb.create(|t| {
        t.timestamps();
        Ok(())
    })
    .unwrap();
    qb.table_options(
        TableOptions::new()
            .with_engine("InnoDB")
            .with_timestamp_format(TimestampFormat::DateTime),
    );
    let qb = built(qb);

    assert_eq!(
        qb.query(),
        "CREATE TABLE `users` (`created` TIMESTAMP NOT NULL, `updated` TIMESTAMP NOT NULL) \
         ENGINE=InnoDB COLLATE 'utf8_unicode_ci'"
    );
    assert!(qb.trigger_statements().iter().all(|s| !s.contains("UNIX_TIMESTAMP")));
    assert!(qb.trigger_statements()[1].contains("CURRENT_TIMESTAMP"));
}

#[test]
fn test_explicit_timestamp_formats_ignore_options() {
    let mut qb = users();
    qb.table_options(TableOptions::new().with_timestamp_format(TimestampFormat::DateTime));
    qb.create(|t| {
        t.set_timestamp_format(TimestampFormat::Unix).timestamps();
        Ok(())
    })
    .unwrap();
    let qb = built(qb);
    assert!(qb.query().contains("`created` INT UNSIGNED NOT NULL"));

    let mut qb = users();
    qb.alter(|t| {
        t.timestamps_with("made", "touched", TimestampFormat::Unix)?;
        Ok(())
    })
    .unwrap();
    qb.table_options(TableOptions::new().with_timestamp_format(TimestampFormat::DateTime));
    let qb = built(qb);
    assert!(qb.query().contains("ADD `made` INT UNSIGNED NOT NULL"));
    assert!(qb.trigger_statements()[1].contains("UNIX_TIMESTAMP()"));
}

#[test]
fn test_statements_empty_before_build() {
    let mut qb = users();
    qb.drop_table().unwrap();
    assert!(qb.statements().is_empty());

    let mut qb = QueryBuilder::new();
    assert!(qb.build().is_err());
    assert!(qb.statements().is_empty());
}

// ==================== TableBuilder ====================

fn create_table(name: &str) -> TableBuilder {
    let mut t = TableBuilder::create();
    t.table(name);
    t
}

fn alter_table(name: &str) -> TableBuilder {
    let mut t = TableBuilder::alter();
    t.table(name);
    t
}

fn render(mut t: TableBuilder) -> TableBuilder {
    t.build().unwrap();
    t
}

#[test]
fn test_table_columns() {
    let mut t = create_table("products");
    t.add_column("id", "int").unwrap().primary_key(true);
    t.add_column("price", "decimal")
        .unwrap()
        .length("10,2")
        .not_null();
    t.add_column("description", "text").unwrap().null();
    t.add_column("active", "boolean").unwrap().default(1);
    assert_eq!(
        render(t).query(),
        "`id` INT NOT NULL AUTO_INCREMENT PRIMARY KEY, `price` DECIMAL(10,2) NOT NULL, \
         `description` TEXT NULL, `active` BOOLEAN NOT NULL DEFAULT 1"
    );
}

#[test]
fn test_table_id_shorthand() {
    let mut t = create_table("t");
    t.id().unwrap();
    assert_eq!(render(t).query(), "`id` INT(11) NOT NULL AUTO_INCREMENT PRIMARY KEY");

    let mut t = create_table("t");
    t.id_with("order_id", "bigint", 20, true).unwrap();
    assert_eq!(
        render(t).query(),
        "`order_id` BIGINT(20) NOT NULL AUTO_INCREMENT PRIMARY KEY"
    );

    let mut t = create_table("t");
    t.id_with("setting_id", "int", 11, false).unwrap();
    assert_eq!(render(t).query(), "`setting_id` INT(11) NOT NULL PRIMARY KEY");
}

#[test]
fn test_table_foreign_keys() {
    let mut t = create_table("posts");
    t.add_column("user_id", "int").unwrap();
    t.add_foreign_key("user_id", "users", "id")
        .unwrap()
        .on_delete("CASCADE")
        .on_update("CASCADE");
    assert!(render(t).query().ends_with(
        "CONSTRAINT `fk_posts_user_id_users_id` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`) ON DELETE CASCADE ON UPDATE CASCADE"
    ));

    let mut t = create_table("posts");
    t.add_foreign_key("author_id", "users", "id")
        .unwrap()
        .on_delete("CASCADE")
        .with_identifier("custom_fk_posts_author");
    assert_eq!(
        render(t).query(),
        "CONSTRAINT `custom_fk_posts_author` FOREIGN KEY (`author_id`) REFERENCES `users` (`id`) ON DELETE CASCADE"
    );
}

#[test]
fn test_foreign_key_requires_table() {
    let mut t = TableBuilder::create();
    assert!(matches!(
        t.add_foreign_key("user_id", "users", "id"),
        Err(DbiError::MissingTable)
    ));
}

#[test]
fn test_table_constraints_order() {
    let mut t = create_table("users");
    t.add_check("age", "`age` >= 0").unwrap();
    t.add_index(["last_name", "first_name"]).unwrap();
    t.add_unique("email").unwrap();
    t.add_foreign_key("role_id", "roles", "id").unwrap();
    t.add_column("email", "varchar").unwrap().length(255);
    assert_eq!(
        render(t).query(),
        "`email` VARCHAR(255) NOT NULL, \
         CONSTRAINT `fk_users_role_id_roles_id` FOREIGN KEY (`role_id`) REFERENCES `roles` (`id`), \
         CONSTRAINT `uq_email` UNIQUE (`email`), \
         INDEX `idx_last_name_first_name` (`last_name`, `first_name`), \
         CONSTRAINT `chk_age` CHECK (`age` >= 0)"
    );
}

#[test]
fn test_alter_table_fragments() {
    let mut t = alter_table("users");
    t.add_column("phone", "varchar").unwrap().length(20);
    t.change_column("name")
        .unwrap()
        .column_type("varchar")
        .unwrap()
        .length(300);
    t.drop_column("old_field").unwrap();
    t.add_foreign_key("role_id", "roles", "id")
        .unwrap()
        .on_delete("SET NULL");
    t.drop_foreign_key_by_identifier("old_fk_constraint")
        .unwrap();
    assert_eq!(
        render(t).query(),
        "ADD `phone` VARCHAR(20) NOT NULL, \
         CHANGE `name` `name` VARCHAR(300) NOT NULL, \
         DROP INDEX `old_fk_constraint`, DROP FOREIGN KEY `old_fk_constraint`, \
         DROP COLUMN `old_field`, \
         ADD CONSTRAINT `fk_users_role_id_roles_id` FOREIGN KEY (`role_id`) REFERENCES `roles` (`id`) ON DELETE SET NULL"
    );
}

#[test]
fn test_alter_drop_order() {
    let mut t = alter_table("users");
    t.drop_column("legacy").unwrap();
    t.drop_check("age").unwrap();
    t.drop_index("email").unwrap();
    t.drop_unique(["user_id", "role_id"]).unwrap();
    t.drop_foreign_key("role_id", "roles", "id").unwrap();
    assert_eq!(
        render(t).query(),
        "DROP INDEX `fk_users_role_id_roles_id`, DROP FOREIGN KEY `fk_users_role_id_roles_id`, \
         DROP INDEX `uq_user_id_role_id`, DROP INDEX `idx_email`, \
         DROP CHECK `chk_age`, DROP COLUMN `legacy`"
    );
}

#[test]
fn test_drop_by_identifier() {
    let mut t = alter_table("users");
    t.drop_unique_by_identifier("email_unique")
        .unwrap()
        .drop_index_by_identifier("name_lookup")
        .unwrap()
        .drop_check_by_identifier("age_range")
        .unwrap();
    assert_eq!(
        render(t).query(),
        "DROP INDEX `email_unique`, DROP INDEX `name_lookup`, DROP CHECK `age_range`"
    );
}

#[test]
fn test_add_then_drop_default_identifiers_match() {
    let mut add = create_table("users");
    let added = add.add_unique(["user_id", "role_id"]).unwrap().identifier().to_string();

    let mut dropper = alter_table("users");
    dropper.drop_unique(["user_id", "role_id"]).unwrap();
    assert_eq!(render(dropper).query(), format!("DROP INDEX `{added}`"));
}

#[test]
fn test_create_mode_ignores_alter_only_fragments() {
    let mut t = create_table("users");
    t.add_column("id", "int").unwrap();
    t.drop_column("legacy").unwrap();
    t.drop_unique("email").unwrap();
    t.change_column("name").unwrap();
    assert_eq!(render(t).query(), "`id` INT NOT NULL");
}

#[test]
fn test_alter_mode_adds_constraints_with_prefix() {
    let mut t = alter_table("users");
    t.add_unique("email").unwrap();
    t.add_index("name").unwrap();
    t.add_check("age", "`age` > 0").unwrap();
    assert_eq!(
        render(t).query(),
        "ADD CONSTRAINT `uq_email` UNIQUE (`email`), ADD INDEX `idx_name` (`name`), \
         ADD CONSTRAINT `chk_age` CHECK (`age` > 0)"
    );
}

#[test]
fn test_unix_timestamps() {
    let mut t = create_table("users");
    t.id().unwrap();
    t.timestamps();
    let t = render(t);

    assert_eq!(
        t.query(),
        "`id` INT(11) NOT NULL AUTO_INCREMENT PRIMARY KEY, \
         `created` INT UNSIGNED NOT NULL, `updated` INT UNSIGNED NOT NULL"
    );
    assert_eq!(
        t.trigger_statements(),
        &[
            "DROP TRIGGER IF EXISTS `users_created_trigger`".to_string(),
            "CREATE TRIGGER `users_created_trigger` BEFORE INSERT ON `users` FOR EACH ROW \
             BEGIN SET NEW.`created` = UNIX_TIMESTAMP(); SET NEW.`updated` = UNIX_TIMESTAMP(); END"
                .to_string(),
            "DROP TRIGGER IF EXISTS `users_updated_trigger`".to_string(),
            "CREATE TRIGGER `users_updated_trigger` BEFORE UPDATE ON `users` FOR EACH ROW \
             SET NEW.`updated` = UNIX_TIMESTAMP()"
                .to_string(),
        ]
    );
}

#[test]
fn test_datetime_timestamps_in_alter_mode() {
    let mut t = alter_table("legacy_table");
    t.add_column("new_field", "varchar").unwrap().length(100);
    t.timestamps_with("date_created", "date_updated", TimestampFormat::DateTime)
        .unwrap();
    let t = render(t);

    assert_eq!(
        t.query(),
        "ADD `new_field` VARCHAR(100) NOT NULL, \
         ADD `date_created` TIMESTAMP NOT NULL, ADD `date_updated` TIMESTAMP NOT NULL"
    );
    assert!(t.trigger_statements()[1].contains(
        "BEGIN SET NEW.`date_created` = CURRENT_TIMESTAMP; SET NEW.`date_updated` = CURRENT_TIMESTAMP; END"
    ));
    assert!(t.trigger_statements()[3]
        .ends_with("BEFORE UPDATE ON `legacy_table` FOR EACH ROW SET NEW.`date_updated` = CURRENT_TIMESTAMP"));
}

#[test]
fn test_timestamps_with_validates_names() {
    let mut t = create_table("users");
    assert!(t
        .timestamps_with("created at", "updated", TimestampFormat::Unix)
        .unwrap_err()
        .is_invalid_identifier());
    assert!(t.timestamp_columns().is_none());
}

#[test]
fn test_generated_trigger_names() {
    let t = create_table("test_table");
    assert_eq!(
        t.generated_trigger_names(),
        [
            "test_table_created_trigger".to_string(),
            "test_table_updated_trigger".to_string()
        ]
    );
}

#[test]
fn test_drop_timestamp_triggers() {
    let mut t = alter_table("products");
    t.drop_timestamp_triggers();
    t.drop_timestamp_trigger("custom_trigger_name").unwrap();
    t.drop_column("created")
        .unwrap()
        .drop_column("updated")
        .unwrap();
    let t = render(t);

    assert_eq!(t.query(), "DROP COLUMN `created`, DROP COLUMN `updated`");
    assert_eq!(
        t.trigger_statements(),
        &[
            "DROP TRIGGER IF EXISTS `products_created_trigger`".to_string(),
            "DROP TRIGGER IF EXISTS `products_updated_trigger`".to_string(),
            "DROP TRIGGER IF EXISTS `custom_trigger_name`".to_string(),
        ]
    );
}

#[test]
fn test_timestamps_without_table_fail_on_build() {
    let mut t = TableBuilder::create();
    t.timestamps();
    assert!(matches!(t.build(), Err(DbiError::MissingTable)));
}

#[test]
fn test_drop_names_are_validated() {
    let mut t = alter_table("users");
    assert!(t.drop_column("bad name").unwrap_err().is_invalid_identifier());
    assert!(t
        .drop_foreign_key_by_identifier("fk; DROP")
        .unwrap_err()
        .is_invalid_identifier());
    assert!(t
        .drop_unique_by_identifier("")
        .unwrap_err()
        .is_invalid_identifier());
    assert!(t
        .drop_index_by_identifier("1idx")
        .unwrap_err()
        .is_invalid_identifier());
    assert!(t
        .drop_check_by_identifier("chk-age")
        .unwrap_err()
        .is_invalid_identifier());
    assert!(t
        .drop_timestamp_trigger("trg`x")
        .unwrap_err()
        .is_invalid_identifier());
    assert_eq!(render(t).query(), "");
}

#[test]
fn test_retarget_keeps_foreign_key_override() {
    let mut t = create_table("a");
    t.add_foreign_key("user_id", "users", "id")
        .unwrap()
        .with_identifier("fk_owner");
    t.add_foreign_key("team_id", "teams", "id").unwrap();
    t.table("b");
    assert_eq!(
        render(t).query(),
        "CONSTRAINT `fk_owner` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`), \
         CONSTRAINT `fk_b_team_id_teams_id` FOREIGN KEY (`team_id`) REFERENCES `teams` (`id`)"
    );
}
