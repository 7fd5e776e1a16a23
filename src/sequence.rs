//! Longest strictly increasing subsequence, O(n log n)

/// Indices (into `seq`, ascending) of one longest strictly increasing
/// subsequence of `seq`.
///
/// Among equally long subsequences the one whose last element reaches the
/// maximum length first is returned, so elements early in `seq` are preferred
/// as the stable set.
pub fn longest_increasing_subsequence(seq: &[usize]) -> Vec<usize> {
    if seq.is_empty() {
        return Vec::new();
    }

    let mut predecessors = vec![usize::MAX; seq.len()];
    // tails[l] = index of the smallest tail value of any run of length l + 1
    let mut tails: Vec<usize> = Vec::with_capacity(seq.len());
    let mut best_end = 0;

    for (i, &value) in seq.iter().enumerate() {
        let pos = tails.partition_point(|&t| seq[t] < value);
        if pos > 0 {
            predecessors[i] = tails[pos - 1];
        }
        if pos == tails.len() {
            tails.push(i);
            best_end = i;
        } else {
            tails[pos] = i;
        }
    }

    let mut lis = Vec::with_capacity(tails.len());
    let mut k = best_end;
    loop {
        lis.push(k);
        match predecessors[k] {
            usize::MAX => break,
            prev => k = prev,
        }
    }
    lis.reverse();
    lis
}
