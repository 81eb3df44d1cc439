use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::sync::Arc;

use shopcore_customers::{CustomerRepository, NewCustomer};
use shopcore_infra::{
    InMemoryCustomerRepository, InMemoryOrderRepository, InMemoryProductRepository,
};
use shopcore_orders::{CreateOrder, LineRequest, OrderWorkflow};
use shopcore_products::{NewProduct, ProductRepository};

fn bench_create_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_order");

    for line_count in [1usize, 5, 20] {
        group.throughput(Throughput::Elements(line_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(line_count),
            &line_count,
            |b, &line_count| {
                let customers = Arc::new(InMemoryCustomerRepository::new());
                let products = Arc::new(InMemoryProductRepository::new());
                let orders = Arc::new(InMemoryOrderRepository::new());

                let customer = customers
                    .create(NewCustomer {
                        name: "Bench Customer".to_string(),
                        email: "bench@example.com".to_string(),
                    })
                    .unwrap();

                // Deep stock so reservations never fail across iterations.
                let lines: Vec<LineRequest> = (0..line_count)
                    .map(|i| {
                        let product = products
                            .create(NewProduct {
                                name: format!("product-{i}"),
                                price: 1000,
                                stock: i64::MAX / 2,
                            })
                            .unwrap();
                        LineRequest {
                            product_id: product.id,
                            quantity: 1,
                        }
                    })
                    .collect();

                let workflow =
                    OrderWorkflow::new(customers.clone(), products.clone(), orders.clone());
                let request = CreateOrder {
                    customer_id: customer.id,
                    lines,
                };

                b.iter(|| workflow.create_order(black_box(request.clone())).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_create_order);
criterion_main!(benches);
