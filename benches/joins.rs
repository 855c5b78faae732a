use criterion::{criterion_group, criterion_main, Criterion};
use tabula::{JoinCondition, Row};
use tabula_operators::aggregate::aggregate;
use tabula_operators::join::{chain_join, nested_loop_join};

fn make_employees(rows: usize) -> Vec<Row> {
    (0..rows)
        .map(|i| {
            [
                ("e_id", i.to_string()),
                ("department_id", (200 + i % 16).to_string()),
                ("salary", (40_000 + (i % 50) * 250).to_string()),
            ]
            .into_iter()
            .collect()
        })
        .collect()
}

fn make_departments() -> Vec<Row> {
    (0..16)
        .map(|i| {
            [
                ("d_id", (200 + i).to_string()),
                ("department_name", format!("dept-{i}")),
            ]
            .into_iter()
            .collect()
        })
        .collect()
}

fn make_goods(rows: usize, employees: usize) -> Vec<Row> {
    (0..rows)
        .map(|i| {
            [
                ("g_id", i.to_string()),
                ("price", format!("{}.5", i % 300)),
                ("employee_id", (i % employees).to_string()),
            ]
            .into_iter()
            .collect()
        })
        .collect()
}

fn bench_joins(c: &mut Criterion) {
    let employees = make_employees(512);
    let departments = make_departments();
    let goods = make_goods(256, 512);

    c.bench_function("nested_loop_join", |b| {
        b.iter(|| {
            let _ = nested_loop_join(&employees, &departments, "department_id", "d_id").unwrap();
        })
    });

    let c1 = JoinCondition::new("department_id", "d_id");
    let c2 = JoinCondition::new("e_id", "employee_id");
    let steps: [(&[Row], &JoinCondition); 2] =
        [(departments.as_slice(), &c1), (goods.as_slice(), &c2)];
    c.bench_function("chain_join_three_tables", |b| {
        b.iter(|| {
            let _ = chain_join(&employees, &steps);
        })
    });

    c.bench_function("aggregate_avg", |b| {
        b.iter(|| {
            let _ = aggregate(&employees, "avg", "salary").unwrap();
        })
    });
}

criterion_group!(joins, bench_joins);
criterion_main!(joins);
