use unf_canonical::{Canonicalizer, Column, ColumnType, Digits, Table, Value};

fn main() {
    let canonicalizer = Canonicalizer::default();
    let table = Table::new(vec![
        Column::from_reals("height", vec![1.2345678, f64::NAN, 3.0]),
        Column::new(
            "label",
            ColumnType::Text,
            vec![Value::from("a"), Value::Missing, Value::from("c")],
        )
        .expect("valid column"),
    ])
    .expect("valid table");

    for digits in [Digits::DEFAULT, Digits::new(3).expect("valid digits")] {
        for column in table.columns() {
            match column.fingerprint(digits, &canonicalizer) {
                Ok(fp) => println!("{:<8} {}", column.name(), fp),
                Err(err) => {
                    eprintln!("fingerprinting failed: {}", err);
                    std::process::exit(1);
                }
            }
        }
        match table.fingerprint(digits, &canonicalizer) {
            Ok(fp) => println!("{:<8} {}", "table", fp),
            Err(err) => {
                eprintln!("fingerprinting failed: {}", err);
                std::process::exit(1);
            }
        }
    }
}
