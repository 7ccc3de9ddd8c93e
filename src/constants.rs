/// Category codes and their canonical labels
pub const CATEGORY_MAP: [(i64, &str); 4] = [
    (1, "Electronics"),
    (2, "Apparel"),
    (3, "Books"),
    (4, "Home Goods"),
];

/// Label used for any category outside the fixed vocabulary
pub const MISC_CATEGORY: &str = "Misc";

// Default file locations (relative to the working directory)
pub const DEFAULT_ORDERS_PATH: &str = "customer_orders.json";
pub const DEFAULT_VIP_PATH: &str = "vip_customers.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "customer_data_cleaned_vip.csv";
pub const DEFAULT_CONFIG_PATH: &str = "etl_config.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "etl.log";

/// Output columns, in the order they are written
pub const COLUMNS: [&str; 13] = [
    "customer_id",
    "customer_name",
    "registration_date",
    "is_vip",
    "order_id",
    "order_date",
    "product_id",
    "product_name",
    "category",
    "unit_price",
    "item_quantity",
    "total_item_price",
    "total_order_value_percentage",
];

/// Look up the canonical label for a category code
pub fn category_label(code: i64) -> Option<&'static str> {
    CATEGORY_MAP
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Whether a label belongs to the output vocabulary (the mapped labels plus Misc)
pub fn is_known_category(label: &str) -> bool {
    label == MISC_CATEGORY || CATEGORY_MAP.iter().any(|(_, l)| *l == label)
}
