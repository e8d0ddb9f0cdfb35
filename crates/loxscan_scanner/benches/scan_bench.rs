use criterion::{black_box, criterion_group, criterion_main, Criterion};
use loxscan_diagnostics::DiagnosticCollection;
use loxscan_scanner::Scanner;

// A medium-size Lox program with every lexeme class
const LOX_SOURCE: &str = r#"
// Linked list with a few helpers
class Node {
  init(value, next) {
    this.value = value;
    this.next = next;
  }
}

class List {
  init() {
    this.head = nil;
    this.size = 0;
  }

  push(value) {
    this.head = Node(value, this.head);
    this.size = this.size + 1;
    return this;
  }

  sum() {
    var total = 0;
    var node = this.head;
    while (node != nil) {
      total = total + node.value;
      node = node.next;
    }
    return total;
  }
}

fun fib(n) {
  if (n <= 1) return n;
  return fib(n - 2) + fib(n - 1);
}

var list = List();
for (var i = 0; i < 10; i = i + 1) {
  list.push(i * 2.5);
}

print "sum: " + list.sum();
print "fib: " + fib(20);
print !(1 >= 2) and true or false;
"#;

fn bench_scan_lox(c: &mut Criterion) {
    c.bench_function("scan_lox_medium", |b| {
        b.iter(|| {
            let mut diagnostics = DiagnosticCollection::new();
            let tokens = Scanner::new(black_box(LOX_SOURCE)).scan_tokens(&mut diagnostics);
            black_box(tokens);
        });
    });
}

fn bench_scan_comment_heavy(c: &mut Criterion) {
    let source: String = (0..500)
        .map(|i| format!("// comment line {} with some words in it\nvar x{} = \"text\";\n", i, i))
        .collect();
    c.bench_function("scan_comment_heavy", |b| {
        b.iter(|| {
            let mut diagnostics = DiagnosticCollection::new();
            let tokens = Scanner::new(black_box(&source)).scan_tokens(&mut diagnostics);
            black_box(tokens);
        });
    });
}

criterion_group!(benches, bench_scan_lox, bench_scan_comment_heavy);
criterion_main!(benches);
