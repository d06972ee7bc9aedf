/*!

This is the long-form manual for `robust_rank` and the `rra` command line.

## Input format

The input is a whitespace-separated text file. The first line is a header with four
columns, which is skipped. Each following line describes one item:

```text
<item id> <group id> <list id> <value>
```

| column     | meaning                                                        |
|------------|----------------------------------------------------------------|
| `item id`  | name of the measured item (for example an sgRNA)               |
| `group id` | name of the group the item is aggregated into (a gene)         |
| `list id`  | name of the ranked list the value belongs to (a screen)        |
| `value`    | the measurement. Lower values rank first.                      |

Groups and lists are created the first time their name appears. An item belongs to exactly
one group and one list; a group can have items in several lists.

## Output format

A tab-separated file with one line per group, sorted by increasing lo-value:

```text
group_id	#_items_in_group	lo_value	FDR
geneA	4	1.2300e-06	0.003125
```

## Options

### `maxPercentile` (default 0.25)

Only the order statistics of a group whose percentile is at most this value are
considered when computing the lo-value. The smallest percentile of a group is always
considered. Increasing it makes the test sensitive to groups with a larger share of
enriched items, at the cost of scanning more order statistics.

### `randPassesPerGroup` (default 100)

The number of null lo-values simulated per real group. The total number of null
lo-values is rounded up to a whole number of passes over all the groups.

### `randomSeed` (default 123456)

Seed of the null simulation. Two runs with the same seed and the same input produce the
same false discovery rates, bit for bit.

### `generator` (default `lehmer`)

- `lehmer`: the Park-Miller minimal standard generator (multiplier 48271). With the default
  seed, it draws the same sequence as the classic multi-stream Lehmer library.
- `xoshiro`: the xoshiro256++ generator.

### `maxGroups`, `maxLists` (defaults 100000 and 1000)

Limits on the number of distinct groups and lists. Going over a limit stops the run before
any statistic is computed.

## Statistical notes

Under the null hypothesis, the percentile of an item is uniform in (0, 1) and independent
across items. The `k`-th smallest of the `n` percentiles of a group then follows a
Beta(k, n - k + 1) distribution. The lo-value is the smallest of these CDF values over
the considered order statistics. It is not a p-value, because its null distribution depends
on `n` and on the number of order statistics scanned. The false discovery rate is obtained by
comparing the rank of each lo-value among simulated null lo-values with its rank among the
real groups:

```text
fdr_i = midrank_in_null(lo_i) / null_count / (i + 0.5) * group_count
```

followed by a cap at 1 and a running minimum from the least significant group upwards.
*/
