//! Built-in sample datasets for trying the checker without a file.

use crate::models::{Cell, Dataset};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Available sample datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    /// Sales transactions
    Sales,
    /// Stock levels and suppliers
    Inventory,
    /// Staff records
    Employees,
}

impl SampleKind {
    pub const ALL: [SampleKind; 3] = [
        SampleKind::Sales,
        SampleKind::Inventory,
        SampleKind::Employees,
    ];

    /// Display name of the sample
    pub fn title(&self) -> &'static str {
        match self {
            SampleKind::Sales => "Sales Data",
            SampleKind::Inventory => "Inventory Management",
            SampleKind::Employees => "Employee Records",
        }
    }

    /// Title lowercased with whitespace replaced by underscores
    pub fn file_stem(&self) -> String {
        self.title()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Filename used when the sample is written to disk
    pub fn file_name(&self) -> String {
        format!("{}_sample.csv", self.file_stem())
    }
}

/// Build the dataset for a sample
pub fn sample_dataset(kind: SampleKind) -> Dataset {
    match kind {
        SampleKind::Sales => sales(),
        SampleKind::Inventory => inventory(),
        SampleKind::Employees => employees(),
    }
}

fn text(value: &str) -> Cell {
    Cell::from(value)
}

fn num(value: f64) -> Cell {
    Cell::Number(value)
}

fn header(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|name| text(name)).collect()
}

fn sales() -> Dataset {
    let rows = [
        ("2024-01-15", "Laptop Pro", "John Smith", 2.0, 1299.99, 2599.98, "North", "Tech Corp"),
        ("2024-01-16", "Wireless Mouse", "Sarah Johnson", 15.0, 29.99, 449.85, "South", "Office Solutions"),
        ("2024-01-17", "Keyboard", "Mike Davis", 8.0, 79.99, 639.92, "East", "StartupHub"),
        ("2024-01-18", "Monitor 27''", "Emily Brown", 3.0, 299.99, 899.97, "West", "Design Studio"),
        ("2024-01-19", "Laptop Pro", "John Smith", 1.0, 1299.99, 1299.99, "North", "University"),
        ("2024-01-20", "Tablet", "Lisa Wilson", 5.0, 399.99, 1999.95, "South", "Education Inc"),
        ("2024-01-21", "Wireless Mouse", "Mike Davis", 20.0, 29.99, 599.80, "East", "Corporate LLC"),
        ("2024-01-22", "Smartphone", "Sarah Johnson", 7.0, 699.99, 4899.93, "South", "Retail Chain"),
        ("2024-01-23", "Headphones", "Emily Brown", 12.0, 149.99, 1799.88, "West", "Music Store"),
        ("2024-01-24", "Laptop Pro", "Lisa Wilson", 4.0, 1299.99, 5199.96, "South", "Government"),
    ];

    let mut grid = vec![header(&[
        "Date",
        "Product",
        "Salesperson",
        "Quantity",
        "Unit Price",
        "Total",
        "Region",
        "Customer",
    ])];
    grid.extend(rows.iter().map(
        |&(date, product, person, quantity, price, total, region, customer)| {
            vec![
                text(date),
                text(product),
                text(person),
                num(quantity),
                num(price),
                num(total),
                text(region),
                text(customer),
            ]
        },
    ));
    Dataset::new(grid)
}

fn inventory() -> Dataset {
    let rows = [
        ("LT001", "Gaming Laptop", "Electronics", 45.0, 10.0, "TechSupply Co", "2024-01-20", "In Stock"),
        ("MS002", "Wireless Mouse", "Accessories", 150.0, 25.0, "PeripheralPro", "2024-01-19", "In Stock"),
        ("KB003", "Mechanical Keyboard", "Accessories", 8.0, 15.0, "KeyMaster Ltd", "2024-01-18", "Low Stock"),
        ("MN004", "4K Monitor", "Electronics", 22.0, 5.0, "DisplayTech", "2024-01-21", "In Stock"),
        ("TB005", "Tablet Pro", "Electronics", 3.0, 8.0, "MobileTech Inc", "2024-01-17", "Critical"),
        ("HP006", "Bluetooth Headphones", "Audio", 67.0, 20.0, "SoundWave Co", "2024-01-20", "In Stock"),
        ("CM007", "Webcam HD", "Accessories", 89.0, 30.0, "VisionTech", "2024-01-19", "In Stock"),
        ("SP008", "Smartphone", "Electronics", 12.0, 10.0, "PhoneCorp", "2024-01-22", "Low Stock"),
        ("CH009", "Charging Cable", "Accessories", 200.0, 50.0, "CablePro", "2024-01-18", "In Stock"),
        ("ST010", "External SSD", "Storage", 35.0, 15.0, "StorageMax", "2024-01-21", "In Stock"),
    ];

    let mut grid = vec![header(&[
        "SKU",
        "Product Name",
        "Category",
        "Stock Level",
        "Reorder Point",
        "Supplier",
        "Last Updated",
        "Status",
    ])];
    grid.extend(rows.iter().map(
        |&(sku, name, category, stock, reorder, supplier, updated, status)| {
            vec![
                text(sku),
                text(name),
                text(category),
                num(stock),
                num(reorder),
                text(supplier),
                text(updated),
                text(status),
            ]
        },
    ));
    Dataset::new(grid)
}

fn employees() -> Dataset {
    let rows = [
        ("EMP001", "Alice Johnson", "Engineering", "Senior Developer", "2022-03-15", 95000.0, "John Smith", "Active"),
        ("EMP002", "Bob Chen", "Marketing", "Marketing Manager", "2021-07-22", 78000.0, "Sarah Davis", "Active"),
        ("EMP003", "Carol Williams", "HR", "HR Specialist", "2023-01-10", 62000.0, "Mike Wilson", "Active"),
        ("EMP004", "David Brown", "Sales", "Sales Representative", "2022-11-05", 55000.0, "Lisa Garcia", "Active"),
        ("EMP005", "Eva Rodriguez", "Engineering", "Frontend Developer", "2023-06-18", 72000.0, "John Smith", "Active"),
        ("EMP006", "Frank Miller", "Finance", "Financial Analyst", "2021-09-12", 68000.0, "Tom Anderson", "Active"),
        ("EMP007", "Grace Kim", "Operations", "Operations Coordinator", "2022-02-28", 58000.0, "Amy Taylor", "Active"),
        ("EMP008", "Henry Lee", "Engineering", "DevOps Engineer", "2023-04-03", 85000.0, "John Smith", "Active"),
        ("EMP009", "Iris White", "Marketing", "Content Specialist", "2023-08-14", 52000.0, "Sarah Davis", "Active"),
        ("EMP010", "Jack Thompson", "Sales", "Senior Sales Rep", "2020-12-01", 72000.0, "Lisa Garcia", "Active"),
    ];

    let mut grid = vec![header(&[
        "Employee ID",
        "Name",
        "Department",
        "Position",
        "Hire Date",
        "Salary",
        "Manager",
        "Status",
    ])];
    grid.extend(rows.iter().map(
        |&(id, name, department, position, hired, salary, manager, status)| {
            vec![
                text(id),
                text(name),
                text(department),
                text(position),
                text(hired),
                num(salary),
                text(manager),
                text(status),
            ]
        },
    ));
    Dataset::new(grid)
}
