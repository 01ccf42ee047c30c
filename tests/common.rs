use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};

/// Command for the orderpick binary, run inside `dir` so no stray config
/// file is picked up
pub fn orderpick(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("orderpick");
    cmd.current_dir(dir).env_remove("ORDERPICK_CONFIG");
    cmd
}

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Two bookable orders and one draft
#[allow(dead_code)]
pub fn write_orders(dir: &Path) -> PathBuf {
    write_file(
        dir,
        "orders.json",
        r#"[
  {
    "id": "O1",
    "purchaseOrderNumber": "PO-100",
    "status": "READY_FOR_BOOKING",
    "createdDate": "2024-03-01T10:00:00Z",
    "lineItems": [
      {"id": "L1", "lineNumber": 1, "sku": "BOLT"},
      {"id": "L2", "lineNumber": 2, "sku": "NUT"}
    ]
  },
  {
    "id": "O2",
    "purchaseOrderNumber": "PO-200",
    "status": "READY_FOR_BOOKING",
    "createdDate": "2024-03-02T10:00:00Z",
    "lineItems": [
      {"id": "L3", "lineNumber": "1"}
    ]
  },
  {
    "id": "O3",
    "purchaseOrderNumber": "PO-300",
    "status": "DRAFT",
    "createdDate": "2024-03-03T10:00:00Z",
    "lineItems": [
      {"id": "L4", "lineNumber": 1}
    ]
  }
]"#,
    )
}
