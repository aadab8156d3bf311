use quantmap::map::RefCountMap;

fn main() {
    let mut report = RefCountMap::try_with_bounds(0, 3).expect("valid bucket range");

    for _ in 0..5 {
        report.add_item("Assets/Textures/brick.png");
    }
    report.add_item("Assets\\Textures\\BRICK.png");
    report.add_item("Assets/Materials/brick.mat");

    println!(
        "brick.png used {} times",
        report.usage("assets/textures/brick.png").expect("tracked")
    );
    println!("{}", report.to_json().expect("export"));
}

// Expected output (abridged):
// brick.png used 6 times
// {
//   "lower_bucket_index": 0,
//   "upper_bucket_index": 3,
//   "total_items": 7,
//   "buckets": [ ... "From 4 to 7" holds "assets/textures/brick.png" ... ]
// }
//
// Explanation: all six spellings of brick.png collapse to one canonical key
// with count 6, which lands in the "From 4 to 7" bucket; brick.mat has a
// single reference and stays in "<= 1".
